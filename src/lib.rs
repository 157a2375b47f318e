//! HeatClip Library
//!
//! Finds the Most Replayed moments of a YouTube video and turns them into
//! short-form clips: heatmap extraction, segment selection, reframe planning
//! and a per-clip download, transcode and caption pipeline.

pub mod adapters;
pub mod app;
pub mod captions;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod heatmap;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config_initialization::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{ClipResult, HeatmapSegment, SelectionPolicy, VideoId, WorkItem};
pub use error::{HeatclipError, HeatclipResult};
