//! Transcode engine module
//!
//! Builds ffmpeg command lines and runs external tools as child processes.

pub mod command;
pub mod process;

pub use command::FfmpegCommand;
pub use process::{run_tool, ToolOutput};

/// Encoder parameters shared by every re-encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    /// Video codec
    pub video_codec: String,
    /// Encoding preset
    pub preset: String,
    /// CRF quality setting
    pub crf: u8,
    /// Audio codec for reframed clips
    pub audio_codec: String,
    /// Audio bitrate for reframed clips
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "ultrafast".to_string(),
            crf: 26,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}
