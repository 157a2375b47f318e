//! Scale, crop and stack filter construction

use tracing::debug;

use super::{FilterGraph, GeometryPlan, SplitRegions, DEFAULT_BOTTOM_HEIGHT};
use crate::domain::model::{CropMode, RatioPreset};

/// Derives filter plans from output dimensions
#[derive(Debug, Clone)]
pub struct GeometryPlanner {
    bottom_height: u32,
}

impl Default for GeometryPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_BOTTOM_HEIGHT)
    }
}

impl GeometryPlanner {
    /// Create planner with the given split bottom height
    pub fn new(bottom_height: u32) -> Self {
        Self { bottom_height }
    }

    /// Plan the reframe for a ratio preset and requested crop mode
    pub fn plan(&self, ratio: RatioPreset, crop: CropMode) -> GeometryPlan {
        let Some((width, height)) = ratio.dimensions() else {
            return GeometryPlan {
                output_width: None,
                output_height: None,
                crop_mode: crop,
                filter_graph: FilterGraph::None,
                split: None,
            };
        };

        if crop.is_split() && height > width {
            let regions = self.split_heights(height);
            let bottom_x = match crop {
                CropMode::SplitRight => format!("iw-{}", width),
                _ => "0".to_string(),
            };
            let graph = format!(
                "{scaled}[scaled];\
                 [scaled]split=2[s1][s2];\
                 [s1]crop={w}:{top}:(iw-{w})/2:(ih-{h})/2[top];\
                 [s2]crop={w}:{bottom}:{x}:ih-{bottom}[bottom];\
                 [top][bottom]vstack[out]",
                scaled = cover_scale(width, height),
                w = width,
                h = height,
                top = regions.top_height,
                bottom = regions.bottom_height,
                x = bottom_x,
            );

            return GeometryPlan {
                output_width: Some(width),
                output_height: Some(height),
                crop_mode: crop,
                filter_graph: FilterGraph::Complex {
                    graph,
                    output_label: "[out]".to_string(),
                },
                split: Some(regions),
            };
        }

        if crop.is_split() {
            debug!(ratio = %ratio, "Split layout needs a portrait target, using center crop");
        }

        GeometryPlan {
            output_width: Some(width),
            output_height: Some(height),
            crop_mode: CropMode::Center,
            filter_graph: FilterGraph::Simple(cover_scale_crop(width, height)),
            split: None,
        }
    }

    /// Bottom region is clamped to `[1, height - 1]`; the top takes the rest
    pub fn split_heights(&self, height: u32) -> SplitRegions {
        let bottom_height = self.bottom_height.min(height.saturating_sub(1).max(1));
        let top_height = height.saturating_sub(bottom_height).max(1);
        SplitRegions {
            top_height,
            bottom_height,
        }
    }
}

/// Aspect-preserving scale that fully covers `width`x`height`
pub fn cover_scale(width: u32, height: u32) -> String {
    let aspect = format!("{}/{}", width, height);
    format!(
        "scale='if(gte(iw/ih,{aspect}),-2,{w})':'if(gte(iw/ih,{aspect}),{h},-2)'",
        aspect = aspect,
        w = width,
        h = height
    )
}

/// Cover scale followed by a symmetric crop to exact dimensions
pub fn cover_scale_crop(width: u32, height: u32) -> String {
    format!(
        "{},crop={w}:{h}:(iw-{w})/2:(ih-{h})/2",
        cover_scale(width, height),
        w = width,
        h = height
    )
}
