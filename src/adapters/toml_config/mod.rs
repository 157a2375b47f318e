// TOML config adapter - Reads the optional `[heatclip]` configuration file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{HeatclipError, HeatclipResult};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "heatclip.toml";

/// Values a config file may set; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub min_score: Option<f64>,
    pub max_clips: Option<usize>,
    pub max_duration: Option<f64>,
    pub padding: Option<f64>,
    pub workers: Option<usize>,
    pub crop: Option<String>,
    pub ratio: Option<String>,
    pub subtitle: Option<bool>,
    pub whisper_model: Option<String>,
    pub whisper_models_dir: Option<PathBuf>,
    pub language: Option<String>,
    pub subtitle_font: Option<String>,
    pub subtitle_fontsdir: Option<PathBuf>,
    pub subtitle_location: Option<String>,
    pub bottom_height: Option<u32>,
    pub update_ytdlp: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    heatclip: FileConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a config document
    pub fn parse(content: &str) -> HeatclipResult<FileConfig> {
        let document: ConfigDocument = toml::from_str(content)
            .map_err(|e| HeatclipError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(document.heatclip)
    }

    /// Load a config file; an explicit path must exist
    pub fn load(path: &Path) -> HeatclipResult<FileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeatclipError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        info!("Loading configuration from: {}", path.display());
        Self::parse(&content)
    }

    /// Load the explicit file, else `heatclip.toml` in `cwd` if present
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> HeatclipResult<FileConfig> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = cwd.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(FileConfig::default())
        }
    }
}
