//! Reframe geometry planning module
//!
//! Plans are a pure function of the output preset and crop mode. They are
//! built once per run and shared read-only between clip workers.

use crate::domain::model::CropMode;

pub mod geometry;

pub use geometry::GeometryPlanner;

/// Default height of the bottom (facecam) region in split layouts
pub const DEFAULT_BOTTOM_HEIGHT: u32 = 320;

/// Filter graph handed to the transcoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterGraph {
    /// Keep the source frame untouched
    None,
    /// Single-chain graph passed with `-vf`
    Simple(String),
    /// Labelled graph passed with `-filter_complex`, mapped from `output_label`
    Complex { graph: String, output_label: String },
}

/// Heights of the stacked regions of a split layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRegions {
    pub top_height: u32,
    pub bottom_height: u32,
}

/// Concrete scale/crop/stack parameters for one (ratio, crop mode) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryPlan {
    /// `None` keeps the source width
    pub output_width: Option<u32>,
    /// `None` keeps the source height
    pub output_height: Option<u32>,
    /// Crop mode actually applied, after the landscape fallback
    pub crop_mode: CropMode,
    pub filter_graph: FilterGraph,
    pub split: Option<SplitRegions>,
}

impl GeometryPlan {
    /// Whether the transcode keeps source dimensions
    pub fn is_passthrough(&self) -> bool {
        matches!(self.filter_graph, FilterGraph::None)
    }
}
