// Domain rules - Segment selection policy

use std::cmp::Ordering;

use crate::domain::model::*;

/// Turns extracted heatmap segments into the ordered worklist
#[derive(Debug, Clone)]
pub struct SegmentSelector {
    policy: SelectionPolicy,
}

impl SegmentSelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Keep segments scoring at least `min_score`, highest score first.
    ///
    /// The sort is stable, so equal scores keep their extraction order. The
    /// `max_clips` cap is not applied here: it bounds produced clips, and a
    /// candidate that fails downstream hands its slot to the next one.
    pub fn select(&self, segments: Vec<HeatmapSegment>) -> Vec<HeatmapSegment> {
        let mut kept: Vec<HeatmapSegment> = segments
            .into_iter()
            .filter(|segment| segment.score() >= self.policy.min_score)
            .collect();
        kept.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        kept
    }

    /// Padded window for a segment, clamped to `[0, total_duration]`
    pub fn window_for(&self, segment: &HeatmapSegment, total_duration: f64) -> (f64, f64) {
        let start = (segment.start() - self.policy.padding_seconds).max(0.0);
        let end = (segment.end() + self.policy.padding_seconds).min(total_duration);
        (start, end)
    }

    /// Build work items, dropping windows shorter than the minimum clip length
    pub fn plan_work(&self, segments: &[HeatmapSegment], total_duration: f64) -> Vec<WorkItem> {
        segments
            .iter()
            .filter_map(|segment| {
                let (window_start, window_end) = self.window_for(segment, total_duration);
                if window_end - window_start < self.policy.min_clip_length {
                    tracing::debug!(
                        start = segment.start(),
                        window_start,
                        window_end,
                        "Dropping segment with window shorter than minimum clip length"
                    );
                    return None;
                }
                Some((*segment, window_start, window_end))
            })
            .enumerate()
            .map(|(position, (segment, window_start, window_end))| WorkItem {
                segment,
                index: position + 1,
                window_start,
                window_end,
            })
            .collect()
    }
}
