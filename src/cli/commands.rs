//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{ModelTier, Toolchain};
use crate::app::{AppContainer, DefaultAppContainer, RunSummary};
use crate::cli::Cli;
use crate::config_initialization::{initialize_configuration, AppConfig};
use crate::domain::model::{ClipOutcome, ClipResult, VideoId};

/// Dispatch a parsed command line
pub async fn execute(cli: Cli) -> Result<()> {
    let config = initialize_configuration(&cli.run).context("Failed to load configuration")?;

    if cli.run.check {
        return check(&config).await;
    }

    let url = cli
        .run
        .url
        .as_deref()
        .context("A YouTube link is required (--url)")?;
    clip(&config, url).await
}

/// Run the heatmap-to-clips pipeline for one video
pub async fn clip(config: &AppConfig, url: &str) -> Result<()> {
    let video = VideoId::from_url(url)?;
    info!(video = %video, "Starting HeatClip run");
    info!(
        ratio = %config.ratio,
        subtitles = config.subtitles,
        "Using crop mode: {}",
        config.crop.description()
    );

    // Tools are required before any network activity
    let toolchain = Toolchain::discover()?;
    if config.update_ytdlp {
        toolchain.update_ytdlp().await;
    }

    let container = DefaultAppContainer::new(config, &toolchain)?;
    let summary = container.run_interactor().execute(&video).await?;

    report(config, &summary);
    Ok(())
}

fn report(config: &AppConfig, summary: &RunSummary) {
    for failure in summary.failures() {
        if let Some(reason) = failure_reason(failure) {
            warn!(clip = failure.index, "Skipped: {}", reason);
        }
    }

    if summary.candidates == 0 {
        println!("No high-engagement segments found.");
        return;
    }

    println!(
        "Finished processing. {} clip(s) successfully saved to '{}'.",
        summary.produced,
        config.output_dir.display()
    );
}

fn failure_reason(result: &ClipResult) -> Option<&str> {
    match &result.outcome {
        ClipOutcome::Failure(reason) => Some(reason),
        ClipOutcome::Success(_) => None,
    }
}

/// Check dependencies, optionally update yt-dlp, then exit
pub async fn check(config: &AppConfig) -> Result<()> {
    let toolchain = Toolchain::discover()?;
    if config.update_ytdlp {
        toolchain.update_ytdlp().await;
    }

    println!("ffmpeg: {}", toolchain.ffmpeg.display());
    println!("yt-dlp: {}", toolchain.ytdlp.display());
    match &toolchain.whisper {
        Some(path) => println!("whisper-cli: {}", path.display()),
        None => println!("whisper-cli: not found (subtitles will be skipped)"),
    }

    let model_path = config.model_path();
    let status = if model_path.is_file() { "found" } else { "missing" };
    println!(
        "whisper model: {} (~{}) at {} [{}]",
        config.whisper_model,
        config.whisper_model.approx_size(),
        model_path.display(),
        status
    );
    println!("Available whisper models:");
    for tier in ModelTier::ALL {
        println!("  {:<9} ~{}", tier.name(), tier.approx_size());
    }

    println!("All required dependencies are available.");
    Ok(())
}
