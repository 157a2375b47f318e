//! Most Replayed heatmap parsing
//!
//! The watch page embeds the heatmap as a JSON array between the `"markers":`
//! and `markersMetadata` anchors. This is a scrape of undocumented markup, so
//! every failure mode yields an error the caller can degrade to "no segments".

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::HeatmapSegment;

static MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"markers":\s*(\[.*?\])\s*,\s*"?markersMetadata"?"#)
        .expect("markers pattern is valid")
});

const MARKER_ENVELOPE: &str = "heatMarkerRenderer";

/// Extract engagement segments from a watch page document.
///
/// Records with unparseable numbers are skipped one by one. The result is
/// sorted by score, highest first, with ties kept in page order.
pub fn parse_markers(html: &str, max_duration: f64) -> Result<Vec<HeatmapSegment>, DomainError> {
    let raw = MARKERS
        .captures(html)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| DomainError::Parse("Heatmap markers not found in page".to_string()))?
        .as_str()
        .replace("\\\"", "\"");

    let markers: Vec<Value> = serde_json::from_str(&raw)
        .map_err(|e| DomainError::Parse(format!("Malformed heatmap markers: {}", e)))?;

    let mut segments: Vec<HeatmapSegment> = markers
        .iter()
        .filter_map(|marker| match parse_marker(marker, max_duration) {
            Ok(segment) => Some(segment),
            Err(e) => {
                debug!("Skipping heatmap marker: {}", e);
                None
            }
        })
        .collect();

    segments.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(segments)
}

fn parse_marker(marker: &Value, max_duration: f64) -> Result<HeatmapSegment, DomainError> {
    let marker = marker.get(MARKER_ENVELOPE).unwrap_or(marker);

    // Missing intensity counts as zero engagement
    let score = match marker.get("intensityScoreNormalized") {
        Some(value) => number(value).ok_or_else(|| bad_field("intensityScoreNormalized"))?,
        None => 0.0,
    };
    let start_millis = marker
        .get("startMillis")
        .and_then(number)
        .ok_or_else(|| bad_field("startMillis"))?;
    let duration_millis = marker
        .get("durationMillis")
        .and_then(number)
        .ok_or_else(|| bad_field("durationMillis"))?;

    HeatmapSegment::new(
        start_millis / 1000.0,
        duration_millis / 1000.0,
        score,
        max_duration,
    )
}

/// Numbers arrive either as JSON numbers or as numeric strings
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bad_field(field: &str) -> DomainError {
    DomainError::Parse(format!("Missing or non-numeric {}", field))
}
