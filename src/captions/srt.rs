//! SubRip (.srt) rendering

use std::fmt::Write;
use std::path::Path;

use crate::domain::errors::DomainError;
use crate::domain::model::CaptionTrack;

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm).
///
/// Rounds to whole milliseconds before splitting, so `65.123` renders as
/// `00:01:05,123` rather than drifting to `,122`.
pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Serialize a caption track, entries separated by blank lines
pub fn render_srt(track: &CaptionTrack) -> String {
    let mut output = String::new();
    for entry in &track.entries {
        // Writing into a String cannot fail
        let _ = writeln!(output, "{}", entry.index);
        let _ = writeln!(
            output,
            "{} --> {}",
            format_timestamp(entry.start_time),
            format_timestamp(entry.end_time)
        );
        let _ = writeln!(output, "{}", entry.text);
        let _ = writeln!(output);
    }
    output
}

/// Write a caption track to disk
pub async fn write_srt(track: &CaptionTrack, path: &Path) -> Result<(), DomainError> {
    tokio::fs::write(path, render_srt(track))
        .await
        .map_err(|e| DomainError::Caption(format!("Failed to write {}: {}", path.display(), e)))
}
