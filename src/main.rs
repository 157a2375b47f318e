//! HeatClip CLI
//!
//! Turns the Most Replayed moments of a YouTube video into vertical clips.
//!
//! # Usage
//!
//! ```bash
//! heatclip --url "https://youtu.be/<id>" --crop split_right --subtitle y
//! heatclip --check
//! ```

use anyhow::Result;
use clap::Parser;

use heatclip::cli::{commands, Cli};
use heatclip::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    commands::execute(cli).await
}
