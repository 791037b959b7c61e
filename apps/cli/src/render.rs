use std::{path::Path, time::Duration};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use academy_core::{
    Academy, AcademyError, AssetStatus, Course, Notice, Position, QuizPhase, Tab,
    format_landing_page, format_lesson_summary, format_outline, format_quiz,
};

use crate::command::HELP;

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

pub fn print_banner(course: &Course) {
    println!(
        "\n{}  {}\n",
        style("academy").cyan().bold(),
        style(&course.landing_page().title).dim()
    );
}

pub fn print_landing(course: &Course) {
    rule();
    println!("{}", format_landing_page(course.landing_page()));
    rule();
}

pub fn print_help() {
    for (usage, about) in HELP {
        println!("  {:<24} {}", style(usage).cyan(), style(about).dim());
    }
}

pub fn print_ok(msg: impl std::fmt::Display) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn print_info(msg: impl std::fmt::Display) {
    println!("{} {}", style("•").cyan(), msg);
}

pub fn print_error(err: &AcademyError) {
    println!("{} {}", style("Error:").red().bold(), err);
}

pub fn print_usage(msg: &str) {
    println!("{} {}", style("?").yellow().bold(), msg);
}

pub fn print_outline(academy: &mut Academy) {
    rule();
    print!("{}", format_outline(&academy.open_outline()));
    rule();
}

/// Lesson header plus the active tab, or the certificate view.
pub fn print_lesson(academy: &Academy) {
    let Some(lesson) = academy.current_lesson() else {
        if academy.position() == &Position::Certificate {
            print_certificate(academy);
        }
        return;
    };
    rule();
    println!("{}", style(&lesson.title).bold());
    rule();
    match academy.view().tab {
        Tab::Video => print_video(academy),
        Tab::Summary => print!("{}", format_lesson_summary(lesson)),
    }
    if let Some(answer) = &academy.view().tutor_answer {
        println!("\n{} {}", style("Tutor:").magenta().bold(), answer);
    }
}

pub fn print_video(academy: &Academy) {
    let Some(lesson) = academy.current_lesson() else {
        return;
    };
    match academy.video_status() {
        AssetStatus::Ready(path) => print_ok(format!(
            "Video ready: {}",
            style(path.display()).cyan()
        )),
        AssetStatus::Generating => print_info(style("Generating lesson video...").dim()),
        AssetStatus::Failed(message) => {
            println!("{} {}", style("!").red().bold(), style(message).red());
            println!("  {}", style("type retry-video to try again").dim());
        }
        AssetStatus::Idle => {}
    }
    println!("\n{}", style("Director's Notes").green());
    println!("{}", lesson.video_script);
}

pub fn print_quiz(academy: &Academy) {
    let Some(engine) = academy.quiz() else {
        return;
    };
    print!("{}", format_quiz(engine));
    match engine.phase() {
        QuizPhase::Answering { .. } => {
            println!("{}", style("select <n>, then submit").dim())
        }
        QuizPhase::Feedback { .. } => println!("{}", style("type continue").dim()),
        QuizPhase::Finished { percent, .. } => {
            if engine.outcome().is_some_and(|o| o.passed) {
                print_ok(format!("Lesson complete with {percent}%!"));
                if academy.has_next() {
                    println!("{}", style("type next to continue").dim());
                }
            } else {
                println!(
                    "{} You need {}% to pass. Type retry to try again.",
                    style("✗").red().bold(),
                    academy_core::PASS_THRESHOLD
                );
            }
        }
    }
}

pub fn print_certificate(academy: &Academy) {
    let Ok(text) = academy.certificate_text() else {
        return;
    };
    let name = &academy.progress().name;
    rule();
    println!(
        "{}",
        style(format!("Congratulations, {name}!")).bold().yellow()
    );
    println!("You have successfully completed the course.\n");
    println!(
        "{}",
        style(academy.course().certificate().certificate_title.to_uppercase()).green().bold()
    );
    println!("{}", style(text).italic());
    rule();
    println!(
        "{}",
        style("certificate [path] downloads it, share shows the message").dim()
    );
}

pub fn print_saved(what: &str, path: &Path) {
    println!(
        "{} {} {}",
        style("✓").green().bold(),
        what,
        style(path.display()).cyan()
    );
}

pub fn print_notice(notice: &Notice) {
    match notice {
        Notice::VideoReady { path, .. } => {
            print_ok(format!("Lesson video ready: {}", style(path.display()).cyan()))
        }
        Notice::VideoFailed { message, .. } => {
            println!("{} {}", style("!").red().bold(), style(message).red());
            println!("  {}", style("type retry-video to try again").dim());
        }
        Notice::LectureReady { .. } => {
            print_ok("Audio lecture ready, type play-audio or notes");
        }
    }
}
