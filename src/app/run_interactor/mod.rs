// Run interactor - Heatmap to numbered clips for one video

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::app::clip_interactor::ClipInteractor;
use crate::app::quota::{ClipQuota, OutputLayout};
use crate::domain::model::*;
use crate::domain::rules::SegmentSelector;
use crate::error::HeatclipResult;
use crate::ports::*;

/// Duration assumed when the downloader cannot report one
pub const FALLBACK_VIDEO_DURATION: f64 = 3600.0;

/// Aggregate outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Segments that passed the score filter
    pub candidates: usize,
    /// One result per attempted work item, ordered by index
    pub results: Vec<ClipResult>,
    /// Number of clips written to the output directory
    pub produced: usize,
}

impl RunSummary {
    pub fn failures(&self) -> impl Iterator<Item = &ClipResult> {
        self.results.iter().filter(|result| !result.is_success())
    }
}

/// Interactor for the whole heatmap-to-clips run
pub struct RunInteractor {
    heatmap: Arc<dyn HeatmapPort>,
    downloader: Arc<dyn DownloadPort>,
    clipper: Arc<ClipInteractor>,
    selector: SegmentSelector,
    layout: OutputLayout,
    workers: usize,
}

impl RunInteractor {
    /// Create new run interactor with injected ports
    pub fn new(
        heatmap: Arc<dyn HeatmapPort>,
        downloader: Arc<dyn DownloadPort>,
        clipper: Arc<ClipInteractor>,
        selector: SegmentSelector,
        layout: OutputLayout,
        workers: usize,
    ) -> Self {
        Self {
            heatmap,
            downloader,
            clipper,
            selector,
            layout,
            workers: workers.max(1),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.layout.dir().to_path_buf()
    }

    /// Fetch, select and clip; per-item failures are collected, not returned
    pub async fn execute(&self, video: &VideoId) -> HeatclipResult<RunSummary> {
        let segments = self.heatmap.fetch_engagement_segments(video).await;
        let selected = self.selector.select(segments);
        if selected.is_empty() {
            info!("No segments at or above the minimum score");
            return Ok(RunSummary::default());
        }
        info!(count = selected.len(), "Selected high-engagement segments");

        let total_duration = match self.downloader.video_duration(video).await {
            Ok(duration) => duration,
            Err(e) => {
                warn!(
                    "Could not read video duration ({}), assuming {}s",
                    e, FALLBACK_VIDEO_DURATION
                );
                FALLBACK_VIDEO_DURATION
            }
        };

        let items = self.selector.plan_work(&selected, total_duration);
        tokio::fs::create_dir_all(self.layout.dir()).await?;
        tokio::fs::create_dir_all(self.clipper.arena().work_dir()).await?;

        let quota = Arc::new(ClipQuota::new(
            self.selector.policy().max_clips,
            self.layout.clone(),
        ));
        let mut results = self.process_all(video, items, Arc::clone(&quota)).await?;
        results.sort_by_key(|result| result.index);

        let produced = quota.produced().await;
        info!(produced, attempted = results.len(), "Run finished");

        Ok(RunSummary {
            candidates: selected.len(),
            results,
            produced,
        })
    }

    async fn process_all(
        &self,
        video: &VideoId,
        items: Vec<WorkItem>,
        quota: Arc<ClipQuota>,
    ) -> HeatclipResult<Vec<ClipResult>> {
        let worker_count = self.workers.min(items.len()).max(1);
        let queue = Arc::new(Mutex::new(VecDeque::from(items)));
        let mut workers = JoinSet::new();

        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let quota = Arc::clone(&quota);
            let clipper = Arc::clone(&self.clipper);
            let video = video.clone();

            workers.spawn(async move {
                let mut results = Vec::new();
                while quota.reserve().await {
                    let next = queue.lock().await.pop_front();
                    let Some(item) = next else {
                        quota.release().await;
                        break;
                    };
                    results.push(clipper.process(&video, &item, &quota).await);
                }
                results
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = workers.join_next().await {
            results.extend(joined?);
        }
        Ok(results)
    }
}
