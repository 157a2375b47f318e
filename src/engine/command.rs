//! FFmpeg command builder

use std::path::{Path, PathBuf};

use super::EncodeSettings;
use crate::planner::{FilterGraph, GeometryPlan};

/// Builder for ffmpeg argument lists
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    output_args: Vec<String>,
}

impl FfmpegCommand {
    /// Create new command reading `input` and writing `output`
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
        }
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a labelled graph output plus the source audio, if any
    pub fn map_graph_output(self, label: impl Into<String>) -> Self {
        self.output_arg("-map")
            .output_arg(label)
            .output_arg("-map")
            .output_arg("0:a?")
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Apply the reframe filter graph of a geometry plan
    pub fn apply_plan(self, plan: &GeometryPlan) -> Self {
        match &plan.filter_graph {
            FilterGraph::None => self,
            FilterGraph::Simple(filter) => self.video_filter(filter.clone()),
            FilterGraph::Complex {
                graph,
                output_label,
            } => self
                .filter_complex(graph.clone())
                .map_graph_output(output_label.clone()),
        }
    }

    /// Video encoder settings only
    pub fn encode_video(self, settings: &EncodeSettings) -> Self {
        self.video_codec(settings.video_codec.clone())
            .preset(settings.preset.clone())
            .crf(settings.crf)
    }

    /// Full video and audio re-encode
    pub fn encode(self, settings: &EncodeSettings) -> Self {
        self.encode_video(settings)
            .audio_codec(settings.audio_codec.clone())
            .audio_bitrate(settings.audio_bitrate.clone())
    }

    /// Build the command arguments
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            self.input.to_string_lossy().to_string(),
        ];
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CropMode, RatioPreset};
    use crate::planner::GeometryPlanner;

    #[test]
    fn test_reframe_center_args() {
        let plan = GeometryPlanner::default().plan(RatioPreset::Square, CropMode::Center);
        let args = FfmpegCommand::new("temp_1.mkv", "temp_cropped_1.mp4")
            .apply_plan(&plan)
            .encode(&EncodeSettings::default())
            .build_args();

        assert_eq!(&args[..6], &["-y", "-hide_banner", "-loglevel", "error", "-i", "temp_1.mkv"]);
        assert_eq!(args[6], "-vf");
        assert!(args[7].ends_with("crop=720:720:(iw-720)/2:(ih-720)/2"));
        assert_eq!(
            &args[8..],
            &["-c:v", "libx264", "-preset", "ultrafast", "-crf", "26", "-c:a", "aac", "-b:a", "128k", "temp_cropped_1.mp4"]
        );
    }

    #[test]
    fn test_reframe_split_maps_graph_output() {
        let plan = GeometryPlanner::default().plan(RatioPreset::Portrait, CropMode::SplitLeft);
        let args = FfmpegCommand::new("in.mkv", "out.mp4").apply_plan(&plan).build_args();

        assert_eq!(args[6], "-filter_complex");
        assert_eq!(&args[8..12], &["-map", "[out]", "-map", "0:a?"]);
    }

    #[test]
    fn test_passthrough_has_no_filter() {
        let plan = GeometryPlanner::default().plan(RatioPreset::Original, CropMode::SplitRight);
        let args = FfmpegCommand::new("in.mkv", "out.mp4")
            .apply_plan(&plan)
            .encode(&EncodeSettings::default())
            .build_args();

        assert!(!args.iter().any(|arg| arg == "-vf" || arg == "-filter_complex"));
    }
}
