// Clip interactor - Runs one work item through download, reframe and captions

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use crate::app::quota::ClipQuota;
use crate::captions::{write_srt, CaptionStyle};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::GeometryPlan;
use crate::ports::*;
use crate::utils::remove_best_effort;

/// Per-item pipeline: `Pending -> Downloading -> Transcoding ->
/// (CaptionGenerating -> CaptionBurning) -> Finalized`, or `Failed` from any stage.
pub struct ClipInteractor {
    downloader: Arc<dyn DownloadPort>,
    transcoder: Arc<dyn TranscodePort>,
    transcriber: Option<Arc<dyn TranscribePort>>,
    observer: Arc<dyn StageObserver>,
    plan: Arc<GeometryPlan>,
    caption_style: CaptionStyle,
    arena: ArtifactArena,
}

impl ClipInteractor {
    /// Create new clip interactor with injected ports.
    ///
    /// Captioning is enabled by passing a transcriber.
    pub fn new(
        downloader: Arc<dyn DownloadPort>,
        transcoder: Arc<dyn TranscodePort>,
        transcriber: Option<Arc<dyn TranscribePort>>,
        observer: Arc<dyn StageObserver>,
        plan: Arc<GeometryPlan>,
        caption_style: CaptionStyle,
        arena: ArtifactArena,
    ) -> Self {
        Self {
            downloader,
            transcoder,
            transcriber,
            observer,
            plan,
            caption_style,
            arena,
        }
    }

    pub fn arena(&self) -> &ArtifactArena {
        &self.arena
    }

    /// Process one work item, finalizing through the shared quota.
    ///
    /// The caller must hold a reserved quota slot; it is consumed on success
    /// and released on failure.
    pub async fn process(&self, video: &VideoId, item: &WorkItem, quota: &ClipQuota) -> ClipResult {
        let span = info_span!("clip", index = item.index, score = item.segment.score());
        self.run(video, item, quota).instrument(span).await
    }

    async fn run(&self, video: &VideoId, item: &WorkItem, quota: &ClipQuota) -> ClipResult {
        let artifacts = self.arena.for_item(item.index);
        self.observe(item.index, ClipStage::Pending);
        info!(
            window_start = item.window_start,
            window_end = item.window_end,
            "Processing segment"
        );

        let finished = match self.produce(video, item, &artifacts).await {
            Ok(path) => path,
            Err(e) => return self.fail(item.index, &artifacts, quota, e).await,
        };

        match quota.finalize(&finished).await {
            Ok(output) => {
                self.observe(item.index, ClipStage::Finalized);
                info!("Clip saved to {}", output.display());
                ClipResult::success(item.index, output)
            }
            Err(e) => {
                self.cleanup(&artifacts).await;
                self.observe(item.index, ClipStage::Failed(e.to_string()));
                ClipResult::failure(item.index, e.to_string())
            }
        }
    }

    /// Run every stage up to finalization, returning the surviving artifact
    async fn produce(
        &self,
        video: &VideoId,
        item: &WorkItem,
        artifacts: &ItemArtifacts,
    ) -> Result<PathBuf, DomainError> {
        // Leftovers from an interrupted run must never be mistaken for this item's output
        self.cleanup(artifacts).await;

        self.observe(item.index, ClipStage::Downloading);
        self.download(video, item, artifacts).await?;

        self.observe(item.index, ClipStage::Transcoding);
        self.transcoder
            .reframe(&artifacts.download, &artifacts.transcoded, &self.plan)
            .await?;
        remove_best_effort(&artifacts.download).await;

        let Some(transcriber) = &self.transcriber else {
            return Ok(artifacts.transcoded.clone());
        };

        self.observe(item.index, ClipStage::CaptionGenerating);
        let captioned = self.generate_captions(transcriber.as_ref(), artifacts).await;
        remove_best_effort(&artifacts.audio).await;
        remove_best_effort(&artifacts.transcript).await;

        if let Err(e) = captioned {
            warn!("{}, continuing without subtitles", e);
            remove_best_effort(&artifacts.subtitles).await;
            return Ok(artifacts.transcoded.clone());
        }

        self.observe(item.index, ClipStage::CaptionBurning);
        self.transcoder
            .burn_captions(
                &artifacts.transcoded,
                &artifacts.subtitles,
                &artifacts.captioned,
                &self.caption_style,
            )
            .await?;
        remove_best_effort(&artifacts.transcoded).await;
        remove_best_effort(&artifacts.subtitles).await;

        Ok(artifacts.captioned.clone())
    }

    /// Range download with a single relaxed-selector retry
    async fn download(
        &self,
        video: &VideoId,
        item: &WorkItem,
        artifacts: &ItemArtifacts,
    ) -> Result<(), DomainError> {
        let mut request = DownloadRequest {
            start: item.window_start,
            end: item.window_end,
            selector: FormatSelector::Preferred,
            output: artifacts.download.clone(),
        };

        match self.downloader.download_range(video, &request).await {
            Err(e) if e.is_format_unavailable() => {
                warn!("Preferred format unavailable, retrying with best available streams");
                remove_best_effort(&artifacts.download).await;
                request.selector = FormatSelector::Relaxed;
                self.downloader.download_range(video, &request).await
            }
            other => other,
        }
    }

    async fn generate_captions(
        &self,
        transcriber: &dyn TranscribePort,
        artifacts: &ItemArtifacts,
    ) -> Result<(), DomainError> {
        let segments = transcriber
            .transcribe(&artifacts.transcoded, artifacts)
            .await
            .map_err(|e| match e {
                DomainError::Caption(_) => e,
                other => DomainError::Caption(other.to_string()),
            })?;

        let track = CaptionTrack::from_segments(segments);
        if track.is_empty() {
            return Err(DomainError::Caption("No caption entries".to_string()));
        }
        write_srt(&track, &artifacts.subtitles).await
    }

    async fn fail(
        &self,
        index: usize,
        artifacts: &ItemArtifacts,
        quota: &ClipQuota,
        error: DomainError,
    ) -> ClipResult {
        self.cleanup(artifacts).await;
        quota.release().await;
        self.observe(index, ClipStage::Failed(error.to_string()));
        ClipResult::failure(index, error.to_string())
    }

    async fn cleanup(&self, artifacts: &ItemArtifacts) {
        for path in artifacts.all() {
            remove_best_effort(path).await;
        }
    }

    fn observe(&self, index: usize, stage: ClipStage) {
        self.observer.on_stage(index, &stage);
    }
}
