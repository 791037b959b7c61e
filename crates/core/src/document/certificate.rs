use chrono::NaiveDate;

use crate::{
    document::{Align, Canvas, DrawCommand, FontStyle, Rgb, TextStyle},
    types::CertificateTemplate,
};

pub const NAME_PLACEHOLDER: &str = "{{NAME}}";
pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

const BACKGROUND: Rgb = Rgb(240, 253, 244);
const BORDER: Rgb = Rgb(16, 185, 129);
const TITLE: Rgb = Rgb(6, 78, 59);
const BODY: Rgb = Rgb(51, 65, 85);

pub const SIGNATORY: &str = "Jane Doe";
pub const SIGNATORY_ROLE: &str = "Program Director";
pub const ISSUER: &str = "ESG Fundamentals Academy";

/// Certificate body with the learner's name in place of the placeholder.
pub fn render_text(template: &CertificateTemplate, name: &str) -> String {
    template.certificate_text.replacen(NAME_PLACEHOLDER, name, 1)
}

pub fn format_issue_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn style(size: f32, font: FontStyle, color: Rgb) -> TextStyle {
    TextStyle {
        size,
        font,
        color,
        align: Align::Center,
        max_width: None,
    }
}

fn text(canvas: &mut Canvas, x: f32, y: f32, text: impl Into<String>, style: TextStyle) {
    canvas.push(DrawCommand::Text {
        x,
        y,
        text: text.into(),
        style,
    });
}

fn signature_line(canvas: &mut Canvas, x1: f32, x2: f32) {
    canvas.push(DrawCommand::Line {
        x1,
        y1: 480.0,
        x2,
        y2: 480.0,
        line_width: 1.0,
        color: BODY,
    });
}

/// Lays out the landscape certificate.
pub fn build(template: &CertificateTemplate, name: &str, issued_on: NaiveDate) -> Canvas {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);

    canvas.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        width: WIDTH,
        height: HEIGHT,
        color: BACKGROUND,
    });
    canvas.push(DrawCommand::StrokeRect {
        x: 20.0,
        y: 20.0,
        width: 760.0,
        height: 560.0,
        line_width: 10.0,
        color: BORDER,
    });

    text(
        &mut canvas,
        400.0,
        120.0,
        template.certificate_title.to_uppercase(),
        style(40.0, FontStyle::Bold, TITLE),
    );
    text(
        &mut canvas,
        400.0,
        220.0,
        render_text(template, name),
        TextStyle {
            max_width: Some(600.0),
            ..style(20.0, FontStyle::Normal, BODY)
        },
    );
    text(
        &mut canvas,
        400.0,
        320.0,
        format!("Issued on: {}", format_issue_date(issued_on)),
        style(16.0, FontStyle::Normal, BODY),
    );

    signature_line(&mut canvas, 200.0, 350.0);
    text(
        &mut canvas,
        275.0,
        470.0,
        SIGNATORY,
        style(14.0, FontStyle::Normal, BODY),
    );
    text(
        &mut canvas,
        275.0,
        495.0,
        SIGNATORY_ROLE,
        style(10.0, FontStyle::Italic, BODY),
    );

    signature_line(&mut canvas, 450.0, 600.0);
    text(
        &mut canvas,
        525.0,
        495.0,
        ISSUER,
        style(14.0, FontStyle::Normal, BODY),
    );

    canvas
}
