//! CLI module for HeatClip
//!
//! This module handles command-line argument parsing and command execution.

use clap::Parser;

use crate::utils::LogFormat;

pub mod args;
pub mod commands;

pub use args::RunArgs;

/// HeatClip
///
/// Finds the Most Replayed moments of a YouTube video, downloads only those
/// ranges and turns them into vertical clips with optional burned-in captions.
#[derive(Parser, Debug)]
#[command(name = "heatclip")]
#[command(about = "Turn a video's Most Replayed moments into short-form clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub run: RunArgs,
}
