//! Error handling module for HeatClip

use thiserror::Error;

/// Main error type for HeatClip runs
#[derive(Error, Debug)]
pub enum HeatclipError {
    /// Link is not a recognizable YouTube video URL
    #[error("Invalid YouTube link: {url}")]
    InvalidUrl { url: String },

    /// A required external tool is missing
    #[error("{tool} not found. Please install {tool} and ensure it is in PATH")]
    Precondition { tool: String },

    /// Configuration file, environment or flag value is invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Pipeline component could not be set up
    #[error(transparent)]
    Domain(#[from] crate::domain::errors::DomainError),

    /// A clip worker panicked or was aborted
    #[error("Clip worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl HeatclipError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing-tool error
    pub fn precondition(tool: impl Into<String>) -> Self {
        Self::Precondition { tool: tool.into() }
    }
}

/// Result type alias for HeatClip operations
pub type HeatclipResult<T> = std::result::Result<T, HeatclipError>;
