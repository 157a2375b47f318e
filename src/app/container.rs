use std::sync::Arc;

use crate::adapters::{
    FfmpegAdapter, Toolchain, TracingStageObserver, WhisperCliAdapter, YoutubeHeatmapAdapter,
    YtDlpAdapter,
};
use crate::app::{ClipInteractor, OutputLayout, RunInteractor};
use crate::config_initialization::AppConfig;
use crate::domain::model::ArtifactArena;
use crate::domain::rules::SegmentSelector;
use crate::error::HeatclipResult;
use crate::planner::GeometryPlanner;
use crate::ports::{DownloadPort, HeatmapPort, StageObserver, TranscodePort, TranscribePort};

pub trait AppContainer: Send + Sync {
    fn run_interactor(&self) -> Arc<RunInteractor>;
}

pub struct DefaultAppContainer {
    run_interactor: Arc<RunInteractor>,
}

impl DefaultAppContainer {
    /// Wire production adapters for a resolved configuration and toolchain
    pub fn new(config: &AppConfig, toolchain: &Toolchain) -> HeatclipResult<Self> {
        let heatmap_port = Arc::new(YoutubeHeatmapAdapter::new(
            config.policy.max_duration_per_clip,
            config.fetch_timeout,
        )?);
        let download_port = Arc::new(YtDlpAdapter::new(
            toolchain.ytdlp.clone(),
            config.intermediate_container.clone(),
        ));
        let transcode_port = Arc::new(FfmpegAdapter::new(
            toolchain.ffmpeg.clone(),
            config.encode.clone(),
        ));
        let transcribe_port = config.subtitles.then(|| {
            Arc::new(WhisperCliAdapter::new(
                toolchain.whisper.clone(),
                toolchain.ffmpeg.clone(),
                &config.whisper_models_dir,
                config.whisper_model,
                config.language.clone(),
            )) as Arc<dyn TranscribePort>
        });
        let observer = Arc::new(TracingStageObserver::new());

        let plan = Arc::new(GeometryPlanner::new(config.bottom_height).plan(config.ratio, config.crop));

        let clip_interactor = Arc::new(ClipInteractor::new(
            Arc::clone(&download_port) as Arc<dyn DownloadPort>,
            transcode_port as Arc<dyn TranscodePort>,
            transcribe_port,
            observer as Arc<dyn StageObserver>,
            plan,
            config.caption_style.clone(),
            ArtifactArena::new(config.work_dir.clone()),
        ));

        let run_interactor = Arc::new(RunInteractor::new(
            heatmap_port as Arc<dyn HeatmapPort>,
            download_port as Arc<dyn DownloadPort>,
            clip_interactor,
            SegmentSelector::new(config.policy),
            OutputLayout::new(config.output_dir.clone(), config.output_extension.clone()),
            config.workers,
        ));

        Ok(Self { run_interactor })
    }
}

impl AppContainer for DefaultAppContainer {
    fn run_interactor(&self) -> Arc<RunInteractor> {
        Arc::clone(&self.run_interactor)
    }
}
