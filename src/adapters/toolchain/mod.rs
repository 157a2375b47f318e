// Toolchain adapter - Locates the external executables the pipeline drives

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::engine::run_tool;
use crate::error::{HeatclipError, HeatclipResult};

pub const FFMPEG: &str = "ffmpeg";
pub const YT_DLP: &str = "yt-dlp";
pub const WHISPER_CLI: &str = "whisper-cli";

/// WinGet package folder prefix of the Gyan ffmpeg build
const WINGET_FFMPEG_PACKAGE: &str = "Gyan.FFmpeg";

/// Resolved external tools
#[derive(Debug, Clone, PartialEq)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ytdlp: PathBuf,
    /// Optional; without it captioning degrades per clip
    pub whisper: Option<PathBuf>,
}

impl Toolchain {
    /// Locate tools on `PATH`, with the WinGet fallback for ffmpeg on Windows
    pub fn discover() -> HeatclipResult<Self> {
        Self::discover_with(|tool| which::which(tool).ok(), winget_ffmpeg)
    }

    /// Discovery with injectable lookups
    pub fn discover_with<F, G>(lookup: F, fallback_ffmpeg: G) -> HeatclipResult<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
        G: FnOnce() -> Option<PathBuf>,
    {
        let ffmpeg = lookup(FFMPEG)
            .or_else(fallback_ffmpeg)
            .ok_or_else(|| HeatclipError::precondition(FFMPEG))?;
        let ytdlp = lookup(YT_DLP).ok_or_else(|| HeatclipError::precondition(YT_DLP))?;
        let whisper = lookup(WHISPER_CLI);

        if whisper.is_none() {
            warn!("{} not found, subtitles will be skipped", WHISPER_CLI);
        }
        debug!(ffmpeg = %ffmpeg.display(), ytdlp = %ytdlp.display(), "Toolchain resolved");

        Ok(Self {
            ffmpeg,
            ytdlp,
            whisper,
        })
    }

    /// Best-effort `yt-dlp -U`; failures are logged and ignored
    pub async fn update_ytdlp(&self) {
        info!("Checking for yt-dlp updates");
        match run_tool(&self.ytdlp, ["-U"]).await {
            Ok(output) if output.success() => {
                let summary = output.stdout.lines().last().unwrap_or_default().trim().to_string();
                info!("yt-dlp update check finished: {}", summary);
            }
            Ok(output) => warn!("yt-dlp update failed: {}", output.error_summary()),
            Err(e) => warn!("yt-dlp update failed: {}", e),
        }
    }
}

/// ffmpeg installed through WinGet but not yet on `PATH`
#[cfg(windows)]
fn winget_ffmpeg() -> Option<PathBuf> {
    let local_app_data = std::env::var_os("LOCALAPPDATA")?;
    let packages = PathBuf::from(local_app_data)
        .join("Microsoft")
        .join("WinGet")
        .join("Packages");
    let found = find_winget_ffmpeg(&packages)?;
    info!("Using ffmpeg from WinGet: {}", found.display());
    Some(found)
}

#[cfg(not(windows))]
fn winget_ffmpeg() -> Option<PathBuf> {
    None
}

/// Search a WinGet packages folder for `Gyan.FFmpeg*/**/bin/ffmpeg.exe`
pub fn find_winget_ffmpeg(packages: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(packages).ok()?;

    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(WINGET_FFMPEG_PACKAGE)
        })
        .find_map(|package| {
            WalkDir::new(package.path())
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_dir() && entry.file_name() == "bin")
                .map(|bin| bin.path().join("ffmpeg.exe"))
                .find(|candidate| candidate.is_file())
        })
}
