use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use academy_core::{Academy, AcademyConfig, Course, GeminiClient, GenerativeClient};

mod command;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "academy")]
#[command(about = "ESG Fundamentals course player with an AI tutor and generated lesson media")]
struct Cli {
    /// Directory holding progress.json (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for generated videos, lectures and voice replies
    #[arg(long)]
    media_dir: Option<PathBuf>,

    /// Alternative course content (JSON)
    #[arg(long)]
    course: Option<PathBuf>,

    /// Seconds between video generation status checks
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_client(config: &AcademyConfig) -> Option<Arc<dyn GenerativeClient>> {
    match GeminiClient::from_env(config.provider.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "AI features disabled");
            println!(
                "{} {}",
                style("Note:").yellow().bold(),
                style(format!("{e}. AI features are disabled.")).dim()
            );
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AcademyConfig::from_env()
        .with_data_dir(cli.data_dir)
        .with_media_dir(cli.media_dir)
        .with_poll_interval(cli.poll_interval);

    let course = match &cli.course {
        Some(path) => Course::load(path)
            .await
            .with_context(|| format!("Failed to load course from {}", path.display()))?,
        None => Course::builtin()?,
    };

    render::print_banner(&course);
    let client = build_client(&config);
    let mut academy = Academy::open(course, config, client).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if academy.progress().started {
        academy.resume()?;
        println!(
            "{} Welcome back, {}!",
            style("✓").green().bold(),
            style(&academy.progress().name).cyan()
        );
        render::print_lesson(&academy);
    } else if !repl::landing(&mut academy, &mut lines).await? {
        return Ok(());
    }

    repl::run(&mut academy, &mut lines).await
}
