//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI > Env > File > Defaults. Flags and `HEATCLIP_*` variables
//! are merged by clap before they get here, so this module only layers them
//! over the config file and the defaults.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::{FileConfig, ModelTier, TomlConfigAdapter};
use crate::captions::CaptionStyle;
use crate::cli::RunArgs;
use crate::domain::model::*;
use crate::engine::EncodeSettings;
use crate::error::{HeatclipError, HeatclipResult};
use crate::planner::DEFAULT_BOTTOM_HEIGHT;

/// Immutable run configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
    pub policy: SelectionPolicy,
    pub workers: usize,
    pub crop: CropMode,
    pub ratio: RatioPreset,
    pub subtitles: bool,
    pub whisper_model: ModelTier,
    pub whisper_models_dir: PathBuf,
    pub language: String,
    pub caption_style: CaptionStyle,
    pub bottom_height: u32,
    pub update_ytdlp: bool,
    pub encode: EncodeSettings,
    /// Container the downloader merges into
    pub intermediate_container: String,
    /// Extension of the final clips
    pub output_extension: String,
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("clips"),
            work_dir: PathBuf::from("clips"),
            policy: SelectionPolicy::default(),
            workers: 1,
            crop: CropMode::Center,
            ratio: RatioPreset::Portrait,
            subtitles: true,
            whisper_model: ModelTier::Small,
            whisper_models_dir: PathBuf::from("models"),
            language: "id".to_string(),
            caption_style: CaptionStyle::default(),
            bottom_height: DEFAULT_BOTTOM_HEIGHT,
            update_ytdlp: true,
            encode: EncodeSettings::default(),
            intermediate_container: "mkv".to_string(),
            output_extension: "mp4".to_string(),
            fetch_timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> HeatclipResult<()> {
        let policy = &self.policy;
        if !(0.0..=1.0).contains(&policy.min_score) {
            return Err(HeatclipError::config(format!(
                "min_score must be between 0 and 1, got {}",
                policy.min_score
            )));
        }
        if policy.max_clips == 0 {
            return Err(HeatclipError::config("max_clips must be greater than 0"));
        }
        if !policy.max_duration_per_clip.is_finite() || policy.max_duration_per_clip <= 0.0 {
            return Err(HeatclipError::config(format!(
                "max_duration must be greater than 0, got {}",
                policy.max_duration_per_clip
            )));
        }
        if policy.padding_seconds.is_nan() || policy.padding_seconds < 0.0 {
            return Err(HeatclipError::config(format!(
                "padding cannot be negative, got {}",
                policy.padding_seconds
            )));
        }
        if self.workers == 0 {
            return Err(HeatclipError::config("workers must be greater than 0"));
        }
        if self.bottom_height == 0 {
            return Err(HeatclipError::config("bottom_height must be greater than 0"));
        }
        Ok(())
    }

    /// Weights file for the configured model tier
    pub fn model_path(&self) -> PathBuf {
        self.whisper_models_dir.join(self.whisper_model.file_name())
    }
}

/// Load the config file and layer the command line over it
pub fn initialize_configuration(args: &RunArgs) -> HeatclipResult<AppConfig> {
    let cwd = std::env::current_dir()?;
    let file = TomlConfigAdapter::discover(args.config.as_deref(), &cwd)?;
    build_config(args, file, num_cpus::get())
}

/// Merge arguments over file values over defaults, then validate
pub fn build_config(args: &RunArgs, file: FileConfig, cpu_count: usize) -> HeatclipResult<AppConfig> {
    let defaults = AppConfig::default();

    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or(defaults.output_dir);
    let work_dir = args
        .work_dir
        .clone()
        .or(file.work_dir)
        .unwrap_or_else(|| output_dir.clone());

    let policy = SelectionPolicy {
        min_score: args.min_score.or(file.min_score).unwrap_or(defaults.policy.min_score),
        max_clips: args.max_clips.or(file.max_clips).unwrap_or(defaults.policy.max_clips),
        max_duration_per_clip: args
            .max_duration
            .or(file.max_duration)
            .unwrap_or(defaults.policy.max_duration_per_clip),
        padding_seconds: args.padding.or(file.padding).unwrap_or(defaults.policy.padding_seconds),
        min_clip_length: defaults.policy.min_clip_length,
    };

    let crop = match args.crop.as_deref().or(file.crop.as_deref()) {
        Some(value) => CropMode::parse(value).map_err(invalid)?,
        None => defaults.crop,
    };
    let ratio = match args.ratio.as_deref().or(file.ratio.as_deref()) {
        Some(value) => RatioPreset::parse(value).map_err(invalid)?,
        None => defaults.ratio,
    };
    let subtitles = match args.subtitle.as_deref() {
        Some(value) => parse_yes_no(value)?,
        None => file.subtitle.unwrap_or(defaults.subtitles),
    };
    let whisper_model = match args.whisper_model.as_deref().or(file.whisper_model.as_deref()) {
        Some(value) => ModelTier::parse(value).map_err(invalid)?,
        None => defaults.whisper_model,
    };
    let placement = match args
        .subtitle_location
        .as_deref()
        .or(file.subtitle_location.as_deref())
    {
        Some(value) => CaptionPlacement::parse(value).map_err(invalid)?,
        None => defaults.caption_style.placement,
    };
    let caption_style = CaptionStyle {
        font: args
            .subtitle_font
            .clone()
            .or(file.subtitle_font)
            .unwrap_or(defaults.caption_style.font),
        fonts_dir: args.subtitle_fontsdir.clone().or(file.subtitle_fontsdir),
        placement,
    };

    let requested_workers = args.workers.or(file.workers).unwrap_or(defaults.workers);
    let config = AppConfig {
        output_dir,
        work_dir,
        policy,
        workers: requested_workers,
        crop,
        ratio,
        subtitles,
        whisper_model,
        whisper_models_dir: args
            .whisper_models_dir
            .clone()
            .or(file.whisper_models_dir)
            .unwrap_or(defaults.whisper_models_dir),
        language: args
            .language
            .clone()
            .or(file.language)
            .unwrap_or(defaults.language),
        caption_style,
        bottom_height: file.bottom_height.unwrap_or(defaults.bottom_height),
        update_ytdlp: !args.no_update_ytdlp && file.update_ytdlp.unwrap_or(defaults.update_ytdlp),
        ..defaults
    };
    config.validate()?;

    let workers = config.workers.min(cpu_count.max(1));
    if workers < config.workers {
        info!(requested = config.workers, workers, "Clamping workers to available CPUs");
    }
    debug!(?config, "Configuration resolved");

    Ok(AppConfig { workers, ..config })
}

fn invalid(error: crate::domain::errors::DomainError) -> HeatclipError {
    HeatclipError::config(error.to_string())
}

fn parse_yes_no(value: &str) -> HeatclipResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        other => Err(HeatclipError::config(format!(
            "Invalid subtitle choice: {}. Use y or n",
            other
        ))),
    }
}
