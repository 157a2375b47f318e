// yt-dlp adapter - Range downloads and duration lookup

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::run_tool;
use crate::ports::*;
use crate::utils::TimeParser;

/// stderr marker yt-dlp prints when no stream matches the selector
const FORMAT_UNAVAILABLE: &str = "Requested format is not available";

/// Downloader adapter driving the yt-dlp executable
pub struct YtDlpAdapter {
    program: PathBuf,
    container: String,
}

impl YtDlpAdapter {
    /// Create new adapter merging into the given intermediate container
    pub fn new(program: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            container: container.into(),
        }
    }

    /// Arguments for a range download
    pub fn build_download_args(&self, video: &VideoId, request: &DownloadRequest) -> Vec<String> {
        vec![
            "--force-ipv4".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--force-overwrites".to_string(),
            "--downloader".to_string(),
            "ffmpeg".to_string(),
            "--downloader-args".to_string(),
            format!(
                "ffmpeg_i:-ss {:.3} -to {:.3} -hide_banner -loglevel error",
                request.start, request.end
            ),
            "--merge-output-format".to_string(),
            self.container.clone(),
            "-f".to_string(),
            request.selector.expression().to_string(),
            "-o".to_string(),
            request.output.to_string_lossy().to_string(),
            video.short_url(),
        ]
    }
}

#[async_trait]
impl DownloadPort for YtDlpAdapter {
    async fn video_duration(&self, video: &VideoId) -> Result<f64, DomainError> {
        let output = run_tool(&self.program, ["--get-duration".to_string(), video.short_url()])
            .await
            .map_err(|e| DomainError::Download(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.success() {
            return Err(DomainError::Download(output.error_summary()));
        }

        TimeParser::parse_clock(&output.stdout)
    }

    async fn download_range(&self, video: &VideoId, request: &DownloadRequest) -> Result<(), DomainError> {
        let args = self.build_download_args(video, request);
        debug!(selector = ?request.selector, "Running yt-dlp range download");

        let output = run_tool(&self.program, &args)
            .await
            .map_err(|e| DomainError::Download(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.success() {
            if output.stderr.contains(FORMAT_UNAVAILABLE) {
                return Err(DomainError::FormatUnavailable(output.error_summary()));
            }
            return Err(DomainError::Download(output.error_summary()));
        }

        if !request.output.exists() {
            return Err(DomainError::Download(format!(
                "yt-dlp finished but produced no file at {}",
                request.output.display()
            )));
        }

        info!(
            start = request.start,
            end = request.end,
            "Downloaded segment to {}",
            request.output.display()
        );
        Ok(())
    }
}
