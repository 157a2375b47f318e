//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for a clipping run.
///
/// Every option may also come from a `HEATCLIP_*` environment variable; the
/// flag wins when both are present. Unset options fall back to the config
/// file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// YouTube link (youtu.be/<id>, /watch?v=<id> or /shorts/<id>)
    #[arg(long)]
    pub url: Option<String>,

    /// Crop mode: default, split_left or split_right
    #[arg(long, env = "HEATCLIP_CROP")]
    pub crop: Option<String>,

    /// Burn in auto-generated subtitles (y/n)
    #[arg(long, env = "HEATCLIP_SUBTITLE")]
    pub subtitle: Option<String>,

    /// Whisper model: tiny, base, small, medium, large-v1, large-v2, large-v3
    #[arg(long, env = "HEATCLIP_WHISPER_MODEL")]
    pub whisper_model: Option<String>,

    /// Directory holding ggml-<model>.bin files
    #[arg(long, env = "HEATCLIP_WHISPER_MODELS_DIR")]
    pub whisper_models_dir: Option<PathBuf>,

    /// Transcription language code
    #[arg(long, env = "HEATCLIP_LANGUAGE")]
    pub language: Option<String>,

    /// Subtitle font name
    #[arg(long, env = "HEATCLIP_SUBTITLE_FONT")]
    pub subtitle_font: Option<String>,

    /// Folder containing .ttf/.otf fonts
    #[arg(long, env = "HEATCLIP_SUBTITLE_FONTSDIR")]
    pub subtitle_fontsdir: Option<PathBuf>,

    /// Subtitle position: center or bottom
    #[arg(long, env = "HEATCLIP_SUBTITLE_LOCATION")]
    pub subtitle_location: Option<String>,

    /// Output ratio preset: 9:16, 1:1, 16:9 or original
    #[arg(long, env = "HEATCLIP_RATIO")]
    pub ratio: Option<String>,

    /// Directory receiving clip_<n> files
    #[arg(long, env = "HEATCLIP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for temporary per-clip files (default: output directory)
    #[arg(long, env = "HEATCLIP_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Minimum heatmap intensity (0.0 - 1.0)
    #[arg(long, env = "HEATCLIP_MIN_SCORE")]
    pub min_score: Option<f64>,

    /// Maximum number of clips to produce
    #[arg(long, env = "HEATCLIP_MAX_CLIPS")]
    pub max_clips: Option<usize>,

    /// Maximum segment duration in seconds
    #[arg(long, env = "HEATCLIP_MAX_DURATION")]
    pub max_duration: Option<f64>,

    /// Seconds added before and after each segment
    #[arg(long, env = "HEATCLIP_PADDING")]
    pub padding: Option<f64>,

    /// Clips processed concurrently
    #[arg(long, env = "HEATCLIP_WORKERS")]
    pub workers: Option<usize>,

    /// Configuration file (default: ./heatclip.toml if present)
    #[arg(long, env = "HEATCLIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check dependencies then exit
    #[arg(long)]
    pub check: bool,

    /// Skip the yt-dlp self-update
    #[arg(long)]
    pub no_update_ytdlp: bool,
}
