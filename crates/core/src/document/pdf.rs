use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    path::PaintMode,
};

use super::{Align, Canvas, DrawCommand, FontStyle, Rgb, TextStyle, chars_for_width, wrap_words};
use crate::error::{AcademyError, Result};

const MM_PER_POINT: f32 = 25.4 / 72.0;
const LINE_HEIGHT: f32 = 1.2;

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_POINT)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

fn pdf_error(e: printpdf::Error) -> AcademyError {
    AcademyError::PdfError {
        reason: e.to_string(),
    }
}

struct Fonts {
    normal: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.normal,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Wrapped lines with their baseline origin in canvas coordinates (y down).
pub(crate) fn text_lines(
    x: f32,
    y: f32,
    text: &str,
    style: &TextStyle,
) -> Vec<(f32, f32, String)> {
    let lines = match style.max_width {
        Some(width) => wrap_words(text, chars_for_width(width, style.size)),
        None => vec![text.to_string()],
    };
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let left = match style.align {
                Align::Left => x,
                Align::Center => x - line.chars().count() as f32 * style.size * 0.25,
            };
            (left, y + i as f32 * style.size * LINE_HEIGHT, line)
        })
        .collect()
}

impl Canvas {
    /// Renders the canvas onto a single page of the same size.
    pub fn to_pdf(&self, title: &str) -> Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(self.width), mm(self.height), "Certificate");
        let fonts = Fonts {
            normal: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
            italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_error)?,
        };
        let layer = doc.get_page(page).get_layer(layer);
        for command in &self.commands {
            self.draw(&layer, &fonts, command);
        }
        doc.save_to_bytes().map_err(pdf_error)
    }

    /// Canvas y grows downwards, PDF y upwards.
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(mm(x), mm(self.height - y))
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::new(
            mm(x),
            mm(self.height - y - height),
            mm(x + width),
            mm(self.height - y),
        )
    }

    fn draw(&self, layer: &PdfLayerReference, fonts: &Fonts, command: &DrawCommand) {
        match command {
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color: fill,
            } => {
                layer.set_fill_color(color(*fill));
                layer.add_rect(self.rect(*x, *y, *width, *height).with_mode(PaintMode::Fill));
            }
            DrawCommand::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                color: stroke,
            } => {
                layer.set_outline_color(color(*stroke));
                layer.set_outline_thickness(*line_width);
                layer.add_rect(self.rect(*x, *y, *width, *height).with_mode(PaintMode::Stroke));
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
                color: stroke,
            } => {
                layer.set_outline_color(color(*stroke));
                layer.set_outline_thickness(*line_width);
                layer.add_line(Line {
                    points: vec![
                        (self.point(*x1, *y1), false),
                        (self.point(*x2, *y2), false),
                    ],
                    is_closed: false,
                });
            }
            DrawCommand::Text { x, y, text, style } => {
                layer.set_fill_color(color(style.color));
                for (left, baseline, line) in text_lines(*x, *y, text, style) {
                    layer.use_text(
                        line,
                        style.size,
                        mm(left),
                        mm(self.height - baseline),
                        fonts.get(style.font),
                    );
                }
            }
        }
    }
}
