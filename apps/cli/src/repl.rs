use std::{io::Write, path::PathBuf};

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufRead, Lines};
use tracing::debug;

use academy_core::{
    Academy, AcademyError, AssetStatus, GenerationEvents, Position, Tab, get_recording_path,
    media::{Recorder, play},
};

use crate::{
    command::Command,
    render::{self, create_spinner},
};

const DEFAULT_CERTIFICATE_FILE: &str = "ESG_Certificate.pdf";

fn prompt(label: &str) {
    print!("{} ", style(label).cyan().bold());
    let _ = std::io::stdout().flush();
}

async fn read_line<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

/// Asks for the learner's name until it is valid. `false` when input ends.
pub async fn landing<R: AsyncBufRead + Unpin>(
    academy: &mut Academy,
    lines: &mut Lines<R>,
) -> Result<bool> {
    render::print_landing(academy.course());
    loop {
        prompt("Enter your full name to start:");
        let Some(name) = read_line(lines).await? else {
            return Ok(false);
        };
        match academy.start(&name).await {
            Ok(()) => {
                render::print_ok(format!(
                    "Welcome, {}! Type help for commands.",
                    style(&academy.progress().name).cyan()
                ));
                render::print_lesson(academy);
                return Ok(true);
            }
            Err(e @ AcademyError::InvalidName { .. }) => render::print_error(&e),
            Err(e) => return Err(e.into()),
        }
    }
}

enum Flow {
    Continue,
    Quit,
    Restart,
}

pub async fn run<R: AsyncBufRead + Unpin>(
    academy: &mut Academy,
    lines: &mut Lines<R>,
) -> Result<()> {
    let Some(mut events) = academy.take_events() else {
        anyhow::bail!("generation events already taken");
    };

    loop {
        prompt(">");
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(academy, lines, &line).await? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                    Flow::Restart => {
                        if !landing(academy, lines).await? {
                            break;
                        }
                    }
                }
            }
            Some(event) = events.recv() => {
                println!();
                apply_event(academy, &mut events, event);
            }
        }
    }
    Ok(())
}

fn apply_event(
    academy: &mut Academy,
    events: &mut GenerationEvents,
    first: academy_core::GenerationEvent,
) {
    let mut next = Some(first);
    while let Some(event) = next {
        debug!(lesson = %event.lesson_id, kind = ?event.kind, "generation event");
        if let Some(notice) = academy.apply(event) {
            render::print_notice(&notice);
        }
        next = events.try_recv().ok();
    }
}

async fn handle_line<R: AsyncBufRead + Unpin>(
    academy: &mut Academy,
    lines: &mut Lines<R>,
    line: &str,
) -> Result<Flow> {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Flow::Continue),
        Err(usage) => {
            render::print_usage(&usage);
            return Ok(Flow::Continue);
        }
    };

    match execute(academy, lines, command).await {
        Ok(flow) => Ok(flow),
        Err(e) => {
            match e.downcast_ref::<AcademyError>() {
                Some(err) => render::print_error(err),
                None => return Err(e),
            }
            Ok(Flow::Continue)
        }
    }
}

async fn execute<R: AsyncBufRead + Unpin>(
    academy: &mut Academy,
    lines: &mut Lines<R>,
    command: Command,
) -> Result<Flow> {
    match command {
        Command::Help => render::print_help(),
        Command::Outline => render::print_outline(academy),
        Command::Open(target) => {
            academy.navigate(Position::parse(&target)).await?;
            render::print_lesson(academy);
        }
        Command::Next => {
            academy.next().await?;
            render::print_lesson(academy);
        }
        Command::Lesson => render::print_lesson(academy),
        Command::Video => {
            academy.view_tab(Tab::Video)?;
            render::print_lesson(academy);
        }
        Command::Summary => {
            academy.view_tab(Tab::Summary)?;
            render::print_lesson(academy);
        }
        Command::RetryVideo => {
            if academy.retry_video()? {
                render::print_video(academy);
            } else {
                render::print_usage("the video has not failed");
            }
        }
        Command::Audio => {
            academy.ensure_audio();
            match academy.audio_status() {
                AssetStatus::Ready(path) => render::print_saved("Audio lecture:", &path),
                AssetStatus::Generating => {
                    render::print_info(style("Generating audio lecture...").dim())
                }
                AssetStatus::Failed(_) | AssetStatus::Idle => {
                    render::print_usage("the audio lecture is not available for this lesson")
                }
            }
        }
        Command::PlayAudio => match academy.audio_status() {
            AssetStatus::Ready(path) => {
                play(&path).await?;
                render::print_info(format!("Playing {}", style(path.display()).cyan()));
            }
            AssetStatus::Generating => render::print_usage("the audio lecture is still generating"),
            _ => render::print_usage("the audio lecture is not available for this lesson"),
        },
        Command::Notes(path) => {
            let lesson_id = academy
                .current_lesson()
                .map(|l| l.id.clone())
                .ok_or(AcademyError::NoLessonOpen)?;
            let path = path.unwrap_or_else(|| PathBuf::from(format!("{lesson_id}_notes.txt")));
            academy.export_notes(&path).await?;
            render::print_saved("Notes saved:", &path);
        }
        Command::Quiz => {
            academy.start_quiz().await?;
            render::print_quiz(academy);
        }
        Command::Select(option) => {
            academy.select(option)?;
            render::print_quiz(academy);
        }
        Command::Submit => {
            academy.submit()?;
            render::print_quiz(academy);
        }
        Command::Continue => {
            academy.advance().await?;
            render::print_quiz(academy);
        }
        Command::Retry => {
            academy.retry_quiz()?;
            render::print_quiz(academy);
        }
        Command::Ask(question) => {
            let spinner = create_spinner("Thinking...");
            let answer = academy.ask_tutor(&question).await;
            spinner.finish_and_clear();
            if let Some(answer) = answer? {
                println!("{} {}", style("Tutor:").magenta().bold(), answer);
            }
        }
        Command::Voice => voice(academy, lines).await?,
        Command::Certificate(path) => {
            if academy.position() != &Position::Certificate {
                academy.navigate(Position::Certificate).await?;
            }
            render::print_certificate(academy);
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CERTIFICATE_FILE));
            academy.export_certificate(&path).await?;
            render::print_saved("Certificate saved:", &path);
        }
        Command::Share => println!("{}", academy.share_message()?),
        Command::Reset => {
            prompt("Are you sure you want to reset all progress? [y/N]");
            let answer = read_line(lines).await?.unwrap_or_default();
            if answer.trim().eq_ignore_ascii_case("y") || answer.trim().eq_ignore_ascii_case("yes")
            {
                academy.reset().await?;
                render::print_ok("Progress reset.");
                return Ok(Flow::Restart);
            }
            render::print_info("Reset cancelled.");
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Records a spoken question until Enter, then plays the tutor's reply.
async fn voice<R: AsyncBufRead + Unpin>(academy: &mut Academy, lines: &mut Lines<R>) -> Result<()> {
    let lesson_ready = academy.current_lesson().is_some();
    if !lesson_ready {
        return Err(AcademyError::NoLessonOpen.into());
    }
    let recorder = Recorder::start(&get_recording_path(academy.media_dir())).await?;
    prompt("Recording... press Enter to stop");
    read_line(lines).await?;
    let clip = recorder.stop().await?;

    let spinner = create_spinner("Thinking...");
    let answer = academy.ask_by_voice(&clip).await;
    spinner.finish_and_clear();
    let answer = answer?;

    println!("{} {}", style("Tutor:").magenta().bold(), answer.text);
    if let Some(path) = answer.reply_path {
        play(&path).await?;
    }
    Ok(())
}
