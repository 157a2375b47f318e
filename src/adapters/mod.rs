// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod heatmap_http;
pub mod toml_config;
pub mod toolchain;
pub mod tracing_log;
pub mod whisper_cli;
pub mod ytdlp;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use heatmap_http::YoutubeHeatmapAdapter;
pub use toml_config::{FileConfig, TomlConfigAdapter};
pub use toolchain::Toolchain;
pub use tracing_log::TracingStageObserver;
pub use whisper_cli::{ModelTier, WhisperCliAdapter};
pub use ytdlp::YtDlpAdapter;
