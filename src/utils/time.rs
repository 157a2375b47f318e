//! Clock duration parsing

use crate::domain::errors::DomainError;

/// Parser for `SS`, `MM:SS` and `HH:MM:SS` durations as printed by the downloader
pub struct TimeParser;

impl TimeParser {
    /// Parse a clock string to seconds
    pub fn parse_clock(time_str: &str) -> Result<f64, DomainError> {
        let time_str = time_str.trim();
        let invalid = || DomainError::Parse(format!("Invalid duration: '{}'", time_str));

        let parts: Vec<&str> = time_str.split(':').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut seconds = 0.0;
        for part in &parts {
            let value: f64 = part.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            seconds = seconds * 60.0 + value;
        }

        Ok(seconds)
    }
}
