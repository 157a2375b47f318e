// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::domain::errors::DomainError;
use crate::error::{HeatclipError, HeatclipResult};

/// YouTube video identifier resolved from a user-supplied link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Resolve a video id from `youtu.be/<id>`, `/watch?v=<id>` or `/shorts/<id>` links
    pub fn from_url(link: &str) -> HeatclipResult<Self> {
        let invalid = || HeatclipError::InvalidUrl {
            url: link.to_string(),
        };

        let parsed = Url::parse(link.trim()).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?.to_ascii_lowercase();

        let id = match host.as_str() {
            "youtu.be" | "www.youtu.be" => parsed
                .path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_string),
            "youtube.com" | "www.youtube.com" | "m.youtube.com" => {
                if parsed.path() == "/watch" {
                    parsed
                        .query_pairs()
                        .find(|(key, _)| key == "v")
                        .map(|(_, value)| value.into_owned())
                } else if let Some(rest) = parsed.path().strip_prefix("/shorts/") {
                    rest.split('/').next().map(str::to_string)
                } else {
                    None
                }
            }
            _ => None,
        };

        match id {
            Some(id) if !id.is_empty() => Ok(Self(id)),
            _ => Err(invalid()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page, the document carrying the heatmap markers
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Short link handed to the downloader
    pub fn short_url(&self) -> String {
        format!("https://youtu.be/{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One high-engagement region of the Most Replayed heatmap.
///
/// Fields are private so that every instance has passed through [`HeatmapSegment::new`],
/// which enforces `start >= 0`, `duration > 0`, `score` in `[0, 1]` and the duration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapSegment {
    start: f64,
    duration: f64,
    score: f64,
}

impl HeatmapSegment {
    /// Create a segment, capping its duration at `max_duration` seconds
    pub fn new(start: f64, duration: f64, score: f64, max_duration: f64) -> Result<Self, DomainError> {
        if !start.is_finite() || start < 0.0 {
            return Err(DomainError::Parse(format!("Invalid segment start: {}", start)));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DomainError::Parse(format!("Invalid segment duration: {}", duration)));
        }
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(DomainError::Parse(format!("Invalid intensity score: {}", score)));
        }

        Ok(Self {
            start,
            duration: duration.min(max_duration),
            score,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Selection thresholds applied to extracted segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    /// Minimum normalized intensity a segment needs to be considered
    pub min_score: f64,
    /// Maximum number of successfully produced clips
    pub max_clips: usize,
    /// Duration cap applied at extraction time
    pub max_duration_per_clip: f64,
    /// Seconds added before and after each segment
    pub padding_seconds: f64,
    /// Padded windows shorter than this are dropped
    pub min_clip_length: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            min_score: 0.40,
            max_clips: 10,
            max_duration_per_clip: 60.0,
            padding_seconds: 10.0,
            min_clip_length: 3.0,
        }
    }
}

/// A selected segment with its padded, clamped download window
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub segment: HeatmapSegment,
    /// 1-based rank in the worklist; namespaces the item's temporary files
    pub index: usize,
    pub window_start: f64,
    pub window_end: f64,
}

impl WorkItem {
    pub fn window_duration(&self) -> f64 {
        self.window_end - self.window_start
    }
}

/// Output aspect presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatioPreset {
    Portrait,
    Square,
    Landscape,
    Original,
}

impl RatioPreset {
    /// Parse a preset name such as `9:16`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "9:16" => Ok(RatioPreset::Portrait),
            "1:1" => Ok(RatioPreset::Square),
            "16:9" => Ok(RatioPreset::Landscape),
            "original" => Ok(RatioPreset::Original),
            other => Err(DomainError::BadArgs(format!(
                "Invalid ratio preset: {}. Valid presets: 9:16, 1:1, 16:9, original",
                other
            ))),
        }
    }

    /// Fixed target dimensions, `None` when the source frame is kept
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            RatioPreset::Portrait => Some((720, 1280)),
            RatioPreset::Square => Some((720, 720)),
            RatioPreset::Landscape => Some((1280, 720)),
            RatioPreset::Original => None,
        }
    }
}

impl fmt::Display for RatioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RatioPreset::Portrait => "9:16",
            RatioPreset::Square => "1:1",
            RatioPreset::Landscape => "16:9",
            RatioPreset::Original => "original",
        };
        write!(f, "{}", name)
    }
}

/// Crop layout requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropMode {
    /// Cover scale then center crop
    Center,
    /// Centered top region over the bottom-left corner
    SplitLeft,
    /// Centered top region over the bottom-right corner
    SplitRight,
}

impl CropMode {
    /// Parse a crop mode name (`default`, `split_left`, `split_right`)
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "default" | "center" => Ok(CropMode::Center),
            "split_left" => Ok(CropMode::SplitLeft),
            "split_right" => Ok(CropMode::SplitRight),
            other => Err(DomainError::BadArgs(format!(
                "Invalid crop mode: {}. Valid modes: default, split_left, split_right",
                other
            ))),
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, CropMode::SplitLeft | CropMode::SplitRight)
    }

    pub fn description(&self) -> &'static str {
        match self {
            CropMode::Center => "Default center crop",
            CropMode::SplitLeft => "Split crop (bottom-left facecam)",
            CropMode::SplitRight => "Split crop (bottom-right facecam)",
        }
    }
}

/// Vertical placement of burned-in captions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPlacement {
    Bottom,
    Center,
}

impl CaptionPlacement {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "bottom" => Ok(CaptionPlacement::Bottom),
            "center" => Ok(CaptionPlacement::Center),
            other => Err(DomainError::BadArgs(format!(
                "Invalid subtitle location: {}. Valid locations: center, bottom",
                other
            ))),
        }
    }
}

/// Time-aligned text returned by the transcription service
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// One numbered subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEntry {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// Ordered subtitle cues for one clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionTrack {
    pub entries: Vec<CaptionEntry>,
}

impl CaptionTrack {
    /// Number transcript segments from 1 in order, trimming their text
    pub fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        let entries = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| CaptionEntry {
                index: i + 1,
                start_time: segment.start,
                end_time: segment.end,
                text: segment.text.trim().to_string(),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pipeline state of a single work item
#[derive(Debug, Clone, PartialEq)]
pub enum ClipStage {
    Pending,
    Downloading,
    Transcoding,
    CaptionGenerating,
    CaptionBurning,
    Finalized,
    Failed(String),
}

impl ClipStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClipStage::Finalized | ClipStage::Failed(_))
    }
}

impl fmt::Display for ClipStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipStage::Pending => write!(f, "pending"),
            ClipStage::Downloading => write!(f, "downloading"),
            ClipStage::Transcoding => write!(f, "transcoding"),
            ClipStage::CaptionGenerating => write!(f, "caption_generating"),
            ClipStage::CaptionBurning => write!(f, "caption_burning"),
            ClipStage::Finalized => write!(f, "finalized"),
            ClipStage::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of one work item
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOutcome {
    Success(PathBuf),
    Failure(String),
}

/// Result reported to the caller per work item
#[derive(Debug, Clone, PartialEq)]
pub struct ClipResult {
    pub index: usize,
    pub outcome: ClipOutcome,
}

impl ClipResult {
    pub fn success(index: usize, path: PathBuf) -> Self {
        Self {
            index,
            outcome: ClipOutcome::Success(path),
        }
    }

    pub fn failure(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            outcome: ClipOutcome::Failure(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ClipOutcome::Success(_))
    }
}

/// Temporary files owned by one work item, all named after its index
#[derive(Debug, Clone, PartialEq)]
pub struct ItemArtifacts {
    pub download: PathBuf,
    pub transcoded: PathBuf,
    pub captioned: PathBuf,
    pub subtitles: PathBuf,
    pub audio: PathBuf,
    pub transcript: PathBuf,
}

impl ItemArtifacts {
    /// Every path the item may create, in creation order
    pub fn all(&self) -> [&Path; 6] {
        [
            &self.download,
            &self.transcoded,
            &self.audio,
            &self.transcript,
            &self.subtitles,
            &self.captioned,
        ]
    }
}

/// Scratch directory partitioned by work item index.
///
/// Keys are disjoint per item, so concurrently processed items never touch
/// each other's files.
#[derive(Debug, Clone)]
pub struct ArtifactArena {
    work_dir: PathBuf,
}

impl ArtifactArena {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn for_item(&self, index: usize) -> ItemArtifacts {
        ItemArtifacts {
            download: self.work_dir.join(format!("temp_{}.mkv", index)),
            transcoded: self.work_dir.join(format!("temp_cropped_{}.mp4", index)),
            captioned: self.work_dir.join(format!("temp_captioned_{}.mp4", index)),
            subtitles: self.work_dir.join(format!("temp_{}.srt", index)),
            audio: self.work_dir.join(format!("temp_{}.wav", index)),
            transcript: self.work_dir.join(format!("temp_{}.json", index)),
        }
    }
}
