// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::captions::CaptionStyle;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::GeometryPlan;

/// Port for the engagement heatmap source
#[async_trait]
pub trait HeatmapPort: Send + Sync {
    /// Fetch engagement segments, highest score first.
    ///
    /// Never fails: network and parse problems yield an empty list.
    async fn fetch_engagement_segments(&self, video: &VideoId) -> Vec<HeatmapSegment>;
}

/// Format selector used for a range download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelector {
    /// Capped at 1080p with separate best video and audio streams
    Preferred,
    /// Unconstrained best video plus best audio
    Relaxed,
}

impl FormatSelector {
    pub fn expression(&self) -> &'static str {
        match self {
            FormatSelector::Preferred => {
                "bv*[height<=1080][ext=mp4]+ba[ext=m4a]/bv*[height<=1080]+ba/b[height<=1080]/bv*+ba/b"
            }
            FormatSelector::Relaxed => "bv*+ba/b",
        }
    }
}

/// Range download request
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub start: f64,
    pub end: f64,
    pub selector: FormatSelector,
    pub output: PathBuf,
}

/// Port for the video downloader
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Total video duration in seconds
    async fn video_duration(&self, video: &VideoId) -> Result<f64, DomainError>;

    /// Download only `[start, end]` into `request.output`
    async fn download_range(&self, video: &VideoId, request: &DownloadRequest) -> Result<(), DomainError>;
}

/// Port for the transcoder
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Apply the geometry plan and re-encode video and audio
    async fn reframe(&self, input: &Path, output: &Path, plan: &GeometryPlan) -> Result<(), DomainError>;

    /// Burn a subtitle file into the video, copying audio
    async fn burn_captions(
        &self,
        input: &Path,
        subtitles: &Path,
        output: &Path,
        style: &CaptionStyle,
    ) -> Result<(), DomainError>;
}

/// Port for the speech-to-text service
#[async_trait]
pub trait TranscribePort: Send + Sync {
    /// Transcribe a media file into time-aligned segments.
    ///
    /// Scratch files must be confined to the item's `audio` and `transcript` paths.
    async fn transcribe(
        &self,
        media: &Path,
        artifacts: &ItemArtifacts,
    ) -> Result<Vec<TranscriptSegment>, DomainError>;
}

/// Observer of per-item stage transitions
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, index: usize, stage: &ClipStage);
}
