//! Caption styling and SubRip serialization
//!
//! Captions are burned into the frame with ffmpeg's `subtitles` filter. This
//! module builds that filter and the SRT file it reads.

use std::path::{Path, PathBuf};

use crate::domain::model::CaptionPlacement;

pub mod srt;

pub use srt::{format_timestamp, render_srt, write_srt};

/// Appearance of burned-in captions
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub font: String,
    pub fonts_dir: Option<PathBuf>,
    pub placement: CaptionPlacement,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            fonts_dir: None,
            placement: CaptionPlacement::Bottom,
        }
    }
}

impl CaptionStyle {
    /// ASS style override passed as `force_style`
    pub fn force_style(&self) -> String {
        let (alignment, margin_v) = match self.placement {
            CaptionPlacement::Bottom => (2, 40),
            CaptionPlacement::Center => (5, 0),
        };
        format!(
            "FontName={},FontSize=12,Bold=1,\
             PrimaryColour=&HFFFFFF,OutlineColour=&H000000,\
             BorderStyle=1,Outline=2,Shadow=1,\
             Alignment={},MarginV={}",
            self.font, alignment, margin_v
        )
    }

    /// Full `subtitles=` video filter for a caption file.
    ///
    /// The fonts directory is only referenced when it exists on disk.
    pub fn subtitles_filter(&self, subtitles: &Path) -> String {
        let fonts_dir = match &self.fonts_dir {
            Some(dir) if dir.is_dir() => format!(":fontsdir='{}'", escape_filter_path(dir)),
            _ => String::new(),
        };
        format!(
            "subtitles='{}'{}:force_style='{}'",
            escape_filter_path(subtitles),
            fonts_dir,
            self.force_style()
        )
    }
}

/// Absolute path in the form the filter parser accepts: forward slashes, escaped colons
pub fn escape_filter_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
}
