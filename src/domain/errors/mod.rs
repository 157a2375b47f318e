// Domain errors - Per-item failure taxonomy for the clip pipeline

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Heatmap page could not be fetched
    Network(String),
    /// Heatmap payload was missing or malformed
    Parse(String),
    /// The downloader rejected the requested format selector
    FormatUnavailable(String),
    /// Range download failed for any other reason
    Download(String),
    /// Reframe or burn-in encode failed
    Transcode(String),
    /// Transcription or caption serialization failed
    Caption(String),
    /// Surviving artifact could not be moved to the output directory
    Finalize(String),
    /// Invalid arguments provided
    BadArgs(String),
    /// Local file system error
    Io(String),
}

impl DomainError {
    /// Whether the downloader reported that no stream matched the selector.
    pub fn is_format_unavailable(&self) -> bool {
        matches!(self, DomainError::FormatUnavailable(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Network(msg) => write!(f, "Network error: {}", msg),
            DomainError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DomainError::FormatUnavailable(msg) => write!(f, "Requested format is not available: {}", msg),
            DomainError::Download(msg) => write!(f, "Download failed: {}", msg),
            DomainError::Transcode(msg) => write!(f, "Transcode failed: {}", msg),
            DomainError::Caption(msg) => write!(f, "Caption generation failed: {}", msg),
            DomainError::Finalize(msg) => write!(f, "Finalize failed: {}", msg),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}
