//! FFmpeg execution adapter
//!
//! Reframes downloaded segments and burns captions by running the ffmpeg
//! executable as a child process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::captions::CaptionStyle;
use crate::domain::errors::*;
use crate::engine::{run_tool, EncodeSettings, FfmpegCommand};
use crate::planner::GeometryPlan;
use crate::ports::*;

/// FFmpeg-based transcode adapter
pub struct FfmpegAdapter {
    program: PathBuf,
    settings: EncodeSettings,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<PathBuf>, settings: EncodeSettings) -> Self {
        Self {
            program: program.into(),
            settings,
        }
    }

    /// Arguments for the reframe encode
    pub fn reframe_args(&self, input: &Path, output: &Path, plan: &GeometryPlan) -> Vec<String> {
        FfmpegCommand::new(input, output)
            .apply_plan(plan)
            .encode(&self.settings)
            .build_args()
    }

    /// Arguments for the caption burn-in encode
    pub fn burn_args(&self, input: &Path, subtitles: &Path, output: &Path, style: &CaptionStyle) -> Vec<String> {
        FfmpegCommand::new(input, output)
            .video_filter(style.subtitles_filter(subtitles))
            .encode_video(&self.settings)
            .audio_codec("copy")
            .build_args()
    }

    async fn execute(&self, args: Vec<String>, output: &Path) -> Result<(), DomainError> {
        debug!(args = ?args, "Running ffmpeg");

        let result = run_tool(&self.program, &args)
            .await
            .map_err(|e| DomainError::Transcode(format!("Failed to run ffmpeg: {}", e)))?;

        if !result.success() {
            return Err(DomainError::Transcode(result.error_summary()));
        }
        if !output.exists() {
            return Err(DomainError::Transcode(format!(
                "ffmpeg produced no file at {}",
                output.display()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TranscodePort for FfmpegAdapter {
    async fn reframe(&self, input: &Path, output: &Path, plan: &GeometryPlan) -> Result<(), DomainError> {
        self.execute(self.reframe_args(input, output, plan), output).await
    }

    async fn burn_captions(
        &self,
        input: &Path,
        subtitles: &Path,
        output: &Path,
        style: &CaptionStyle,
    ) -> Result<(), DomainError> {
        self.execute(self.burn_args(input, subtitles, output, style), output)
            .await
    }
}
