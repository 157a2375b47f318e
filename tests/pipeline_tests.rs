use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use heatclip::app::{ClipInteractor, OutputLayout, RunInteractor};
use heatclip::captions::CaptionStyle;
use heatclip::domain::model::*;
use heatclip::domain::rules::SegmentSelector;
use heatclip::planner::GeometryPlanner;
use heatclip::ports::*;
use heatclip::DomainError;

/// Test doubles standing in for yt-dlp, ffmpeg and whisper
mod fakes {
    use super::*;

    /// Item index encoded in a temporary file name such as `temp_cropped_12.mp4`
    pub fn index_of(path: &Path) -> usize {
        let stem = path.file_stem().unwrap().to_string_lossy();
        stem.rsplit('_').next().unwrap().parse().unwrap()
    }

    pub struct FakeHeatmap {
        pub segments: Vec<HeatmapSegment>,
    }

    #[async_trait]
    impl HeatmapPort for FakeHeatmap {
        async fn fetch_engagement_segments(&self, _video: &VideoId) -> Vec<HeatmapSegment> {
            self.segments.clone()
        }
    }

    #[derive(Default)]
    pub struct FakeDownloader {
        pub duration: Option<f64>,
        pub failing: HashSet<usize>,
        pub preferred_unavailable: HashSet<usize>,
        /// Keep an existing output file, as yt-dlp does without `--force-overwrites`
        pub keep_existing: bool,
        pub calls: Mutex<Vec<(usize, FormatSelector, f64, f64)>>,
    }

    #[async_trait]
    impl DownloadPort for FakeDownloader {
        async fn video_duration(&self, _video: &VideoId) -> Result<f64, DomainError> {
            self.duration
                .ok_or_else(|| DomainError::Download("duration unavailable".to_string()))
        }

        async fn download_range(&self, _video: &VideoId, request: &DownloadRequest) -> Result<(), DomainError> {
            let index = index_of(&request.output);
            self.calls
                .lock()
                .unwrap()
                .push((index, request.selector, request.start, request.end));

            if self.failing.contains(&index) {
                // Leave a partial file behind, like an interrupted download
                std::fs::write(&request.output, b"partial").unwrap();
                return Err(DomainError::Download("HTTP Error 403".to_string()));
            }
            if request.selector == FormatSelector::Preferred && self.preferred_unavailable.contains(&index) {
                return Err(DomainError::FormatUnavailable("no 1080p stream".to_string()));
            }
            if self.keep_existing && request.output.exists() {
                return Ok(());
            }

            std::fs::write(&request.output, format!("download {}", index)).unwrap();
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakeTranscoder {
        pub failing_reframe: HashSet<usize>,
        pub fail_burn: bool,
        pub burned: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl TranscodePort for FakeTranscoder {
        async fn reframe(&self, input: &Path, output: &Path, _plan: &heatclip::planner::GeometryPlan) -> Result<(), DomainError> {
            let index = index_of(input);
            if self.failing_reframe.contains(&index) {
                std::fs::write(output, b"half-written").unwrap();
                return Err(DomainError::Transcode("encoder crashed".to_string()));
            }
            let source = std::fs::read_to_string(input).unwrap();
            std::fs::write(output, format!("{}|reframed", source)).unwrap();
            Ok(())
        }

        async fn burn_captions(
            &self,
            input: &Path,
            subtitles: &Path,
            output: &Path,
            _style: &CaptionStyle,
        ) -> Result<(), DomainError> {
            assert!(subtitles.exists(), "subtitles must exist before burn-in");
            if self.fail_burn {
                return Err(DomainError::Transcode("subtitles filter failed".to_string()));
            }
            self.burned.lock().unwrap().push(index_of(input));
            let source = std::fs::read_to_string(input).unwrap();
            std::fs::write(output, format!("{}|captioned", source)).unwrap();
            Ok(())
        }
    }

    pub struct FakeTranscriber {
        pub fail: bool,
    }

    #[async_trait]
    impl TranscribePort for FakeTranscriber {
        async fn transcribe(
            &self,
            _media: &Path,
            artifacts: &ItemArtifacts,
        ) -> Result<Vec<TranscriptSegment>, DomainError> {
            std::fs::write(&artifacts.audio, b"pcm").unwrap();
            if self.fail {
                std::fs::write(&artifacts.transcript, b"{").unwrap();
                return Err(DomainError::Caption("model failed to load".to_string()));
            }
            Ok(vec![TranscriptSegment {
                start: 0.5,
                end: 2.0,
                text: "halo".to_string(),
            }])
        }
    }

    #[derive(Default)]
    pub struct RecordingObserver {
        pub stages: Mutex<Vec<(usize, ClipStage)>>,
    }

    impl StageObserver for RecordingObserver {
        fn on_stage(&self, index: usize, stage: &ClipStage) {
            self.stages.lock().unwrap().push((index, stage.clone()));
        }
    }
}

use fakes::*;

struct Harness {
    root: TempDir,
    downloader: Arc<FakeDownloader>,
    transcoder: Arc<FakeTranscoder>,
    observer: Arc<RecordingObserver>,
}

impl Harness {
    fn new(downloader: FakeDownloader, transcoder: FakeTranscoder) -> Self {
        Self {
            root: TempDir::new().unwrap(),
            downloader: Arc::new(downloader),
            transcoder: Arc::new(transcoder),
            observer: Arc::new(RecordingObserver::default()),
        }
    }

    fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn output_dir(&self) -> PathBuf {
        self.root.path().join("clips")
    }

    fn interactor(
        &self,
        segments: Vec<HeatmapSegment>,
        transcriber: Option<Arc<dyn TranscribePort>>,
        max_clips: usize,
        workers: usize,
    ) -> RunInteractor {
        let plan = GeometryPlanner::default().plan(RatioPreset::Portrait, CropMode::Center);
        let clipper = ClipInteractor::new(
            self.downloader.clone() as Arc<dyn DownloadPort>,
            self.transcoder.clone() as Arc<dyn TranscodePort>,
            transcriber,
            self.observer.clone() as Arc<dyn StageObserver>,
            Arc::new(plan),
            CaptionStyle::default(),
            ArtifactArena::new(self.work_dir()),
        );
        let policy = SelectionPolicy {
            max_clips,
            ..SelectionPolicy::default()
        };

        RunInteractor::new(
            Arc::new(FakeHeatmap { segments }),
            self.downloader.clone() as Arc<dyn DownloadPort>,
            Arc::new(clipper),
            SegmentSelector::new(policy),
            OutputLayout::new(self.output_dir(), "mp4"),
            workers,
        )
    }

    fn work_files(&self) -> Vec<String> {
        match std::fs::read_dir(self.work_dir()) {
            Ok(entries) => entries
                .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn video() -> VideoId {
    VideoId::from_url("https://youtu.be/abc123def45").unwrap()
}

/// `count` segments 100 s apart with strictly decreasing scores
fn candidates(count: usize) -> Vec<HeatmapSegment> {
    (0..count)
        .map(|i| HeatmapSegment::new(100.0 * i as f64 + 50.0, 20.0, 1.0 - 0.05 * i as f64, 60.0).unwrap())
        .collect()
}

fn downloader_with_duration() -> FakeDownloader {
    FakeDownloader {
        duration: Some(5000.0),
        ..FakeDownloader::default()
    }
}

#[tokio::test]
async fn test_cap_counts_successes_not_attempts() {
    let downloader = FakeDownloader {
        failing: HashSet::from([3, 7]),
        ..downloader_with_duration()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());

    let summary = harness
        .interactor(candidates(12), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.candidates, 12);
    assert_eq!(summary.produced, 10);
    assert_eq!(summary.results.len(), 12);
    let failed: Vec<usize> = summary.failures().map(|r| r.index).collect();
    assert_eq!(failed, vec![3, 7]);

    for n in 1..=10 {
        assert!(harness.output_dir().join(format!("clip_{}.mp4", n)).exists());
    }
    assert!(!harness.output_dir().join("clip_11.mp4").exists());

    // Completion order is rank order when running sequentially
    let first = std::fs::read_to_string(harness.output_dir().join("clip_1.mp4")).unwrap();
    assert_eq!(first, "download 1|reframed");
    let third = std::fs::read_to_string(harness.output_dir().join("clip_3.mp4")).unwrap();
    assert_eq!(third, "download 4|reframed");

    assert!(harness.work_files().is_empty());
}

#[tokio::test]
async fn test_stops_once_cap_reached() {
    let harness = Harness::new(downloader_with_duration(), FakeTranscoder::default());

    let summary = harness
        .interactor(candidates(8), None, 3, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 3);
    assert_eq!(summary.results.len(), 3);
    assert_eq!(harness.downloader.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_windows_padded_and_clamped() {
    let segments = vec![
        HeatmapSegment::new(5.0, 2.0, 0.9, 60.0).unwrap(),
        HeatmapSegment::new(95.0, 10.0, 0.8, 60.0).unwrap(),
    ];
    let downloader = FakeDownloader {
        duration: Some(100.0),
        ..FakeDownloader::default()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());

    harness
        .interactor(segments, None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    let calls = harness.downloader.calls.lock().unwrap();
    assert_eq!(calls[0], (1, FormatSelector::Preferred, 0.0, 17.0));
    assert_eq!(calls[1], (2, FormatSelector::Preferred, 85.0, 100.0));
}

#[tokio::test]
async fn test_duration_fallback() {
    let segments = vec![HeatmapSegment::new(3590.0, 30.0, 0.9, 60.0).unwrap()];
    let harness = Harness::new(FakeDownloader::default(), FakeTranscoder::default());

    let summary = harness
        .interactor(segments, None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 1);
    let calls = harness.downloader.calls.lock().unwrap();
    assert_eq!(calls[0].3, 3600.0);
}

#[tokio::test]
async fn test_format_unavailable_retries_relaxed_once() {
    let downloader = FakeDownloader {
        preferred_unavailable: HashSet::from([1]),
        ..downloader_with_duration()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());

    let summary = harness
        .interactor(candidates(1), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 1);
    let selectors: Vec<FormatSelector> = harness
        .downloader
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|call| call.1)
        .collect();
    assert_eq!(selectors, vec![FormatSelector::Preferred, FormatSelector::Relaxed]);
}

#[tokio::test]
async fn test_other_download_errors_not_retried() {
    let downloader = FakeDownloader {
        failing: HashSet::from([1]),
        ..downloader_with_duration()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());

    let summary = harness
        .interactor(candidates(1), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 0);
    assert_eq!(harness.downloader.calls.lock().unwrap().len(), 1);
    assert!(harness.work_files().is_empty());
}

#[tokio::test]
async fn test_failed_item_leaves_no_temporary_files() {
    let transcoder = FakeTranscoder {
        failing_reframe: HashSet::from([2]),
        ..FakeTranscoder::default()
    };
    let harness = Harness::new(downloader_with_duration(), transcoder);

    let summary = harness
        .interactor(candidates(3), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 2);
    assert!(!summary.results[1].is_success());
    assert!(harness.work_files().is_empty());

    let stages = harness.observer.stages.lock().unwrap();
    assert!(stages
        .iter()
        .any(|(index, stage)| *index == 2 && matches!(stage, ClipStage::Failed(_))));
}

#[tokio::test]
async fn test_caption_failure_degrades_to_transcoded_clip() {
    let harness = Harness::new(downloader_with_duration(), FakeTranscoder::default());
    let transcriber: Arc<dyn TranscribePort> = Arc::new(FakeTranscriber { fail: true });

    let summary = harness
        .interactor(candidates(1), Some(transcriber), 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 1);
    let clip = std::fs::read_to_string(harness.output_dir().join("clip_1.mp4")).unwrap();
    assert_eq!(clip, "download 1|reframed");
    assert!(harness.transcoder.burned.lock().unwrap().is_empty());
    assert!(harness.work_files().is_empty());

    let stages: Vec<ClipStage> = harness
        .observer
        .stages
        .lock()
        .unwrap()
        .iter()
        .map(|(_, stage)| stage.clone())
        .collect();
    assert!(stages.contains(&ClipStage::CaptionGenerating));
    assert!(!stages.contains(&ClipStage::CaptionBurning));
    assert_eq!(stages.last(), Some(&ClipStage::Finalized));
}

#[tokio::test]
async fn test_captions_burned_when_transcription_succeeds() {
    let harness = Harness::new(downloader_with_duration(), FakeTranscoder::default());
    let transcriber: Arc<dyn TranscribePort> = Arc::new(FakeTranscriber { fail: false });

    let summary = harness
        .interactor(candidates(2), Some(transcriber), 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 2);
    let clip = std::fs::read_to_string(harness.output_dir().join("clip_2.mp4")).unwrap();
    assert_eq!(clip, "download 2|reframed|captioned");
    assert_eq!(*harness.transcoder.burned.lock().unwrap(), vec![1, 2]);
    assert!(harness.work_files().is_empty());
}

#[tokio::test]
async fn test_burn_failure_fails_item() {
    let transcoder = FakeTranscoder {
        fail_burn: true,
        ..FakeTranscoder::default()
    };
    let harness = Harness::new(downloader_with_duration(), transcoder);
    let transcriber: Arc<dyn TranscribePort> = Arc::new(FakeTranscriber { fail: false });

    let summary = harness
        .interactor(candidates(1), Some(transcriber), 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 0);
    assert!(harness.work_files().is_empty());
    assert!(!harness.output_dir().join("clip_1.mp4").exists());
}

#[tokio::test]
async fn test_no_segments_above_threshold() {
    let segments = vec![HeatmapSegment::new(10.0, 5.0, 0.2, 60.0).unwrap()];
    let harness = Harness::new(downloader_with_duration(), FakeTranscoder::default());

    let summary = harness
        .interactor(segments, None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(summary.results.is_empty());
    assert!(harness.downloader.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_parallel_workers_respect_cap() {
    let downloader = FakeDownloader {
        failing: HashSet::from([1, 4, 6]),
        ..downloader_with_duration()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());

    let summary = harness
        .interactor(candidates(12), None, 5, 4)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 5);
    assert_eq!(summary.results.iter().filter(|r| r.is_success()).count(), 5);
    for n in 1..=5 {
        assert!(harness.output_dir().join(format!("clip_{}.mp4", n)).exists());
    }
    assert!(!harness.output_dir().join("clip_6.mp4").exists());

    let indices: Vec<usize> = summary.results.iter().map(|r| r.index).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(indices, sorted);
    assert!(harness.work_files().is_empty());
}

#[tokio::test]
async fn test_stale_download_from_interrupted_run_is_discarded() {
    let downloader = FakeDownloader {
        keep_existing: true,
        ..downloader_with_duration()
    };
    let harness = Harness::new(downloader, FakeTranscoder::default());
    std::fs::create_dir_all(harness.work_dir()).unwrap();
    std::fs::write(harness.work_dir().join("temp_1.mkv"), "leftover from another video").unwrap();
    std::fs::write(harness.work_dir().join("temp_cropped_1.mp4"), "leftover").unwrap();

    let summary = harness
        .interactor(candidates(1), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 1);
    let clip = std::fs::read_to_string(harness.output_dir().join("clip_1.mp4")).unwrap();
    assert_eq!(clip, "download 1|reframed");
    assert!(harness.work_files().is_empty());
}

#[tokio::test]
async fn test_finalize_failure_cleans_up_item() {
    let harness = Harness::new(downloader_with_duration(), FakeTranscoder::default());
    // A directory squatting on the output name makes the move fail
    std::fs::create_dir_all(harness.output_dir().join("clip_1.mp4")).unwrap();

    let summary = harness
        .interactor(candidates(2), None, 10, 1)
        .execute(&video())
        .await
        .unwrap();

    assert_eq!(summary.produced, 0);
    assert_eq!(summary.results.len(), 2);
    assert!(summary.results.iter().all(|result| !result.is_success()));
    assert!(harness.work_files().is_empty());

    let stages = harness.observer.stages.lock().unwrap();
    let failed = stages
        .iter()
        .filter(|(_, stage)| matches!(stage, ClipStage::Failed(reason) if reason.starts_with("Finalize failed")))
        .count();
    assert_eq!(failed, 2);
}
