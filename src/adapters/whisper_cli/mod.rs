// whisper.cpp adapter - Speech-to-text through the whisper-cli executable

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{run_tool, FfmpegCommand};
use crate::ports::*;

/// Speech model size tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Tiny,
    Base,
    Small,
    Medium,
    LargeV1,
    LargeV2,
    LargeV3,
}

impl ModelTier {
    pub const ALL: [ModelTier; 7] = [
        ModelTier::Tiny,
        ModelTier::Base,
        ModelTier::Small,
        ModelTier::Medium,
        ModelTier::LargeV1,
        ModelTier::LargeV2,
        ModelTier::LargeV3,
    ];

    /// Parse a tier name such as `small` or `large-v3`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name() == value)
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Invalid whisper model: {}. Valid models: tiny, base, small, medium, large-v1, large-v2, large-v3",
                    value
                ))
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelTier::Tiny => "tiny",
            ModelTier::Base => "base",
            ModelTier::Small => "small",
            ModelTier::Medium => "medium",
            ModelTier::LargeV1 => "large-v1",
            ModelTier::LargeV2 => "large-v2",
            ModelTier::LargeV3 => "large-v3",
        }
    }

    /// Approximate model download size
    pub fn approx_size(&self) -> &'static str {
        match self {
            ModelTier::Tiny => "75 MB",
            ModelTier::Base => "142 MB",
            ModelTier::Small => "466 MB",
            ModelTier::Medium => "1.5 GB",
            ModelTier::LargeV1 | ModelTier::LargeV2 | ModelTier::LargeV3 => "2.9 GB",
        }
    }

    /// ggml weights file name
    pub fn file_name(&self) -> String {
        format!("ggml-{}.bin", self.name())
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    transcription: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    offsets: WhisperOffsets,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WhisperOffsets {
    from: u64,
    to: u64,
}

/// Parse whisper-cli `-oj` output into transcript segments, dropping blank text
pub fn parse_transcript(json: &str) -> Result<Vec<TranscriptSegment>, DomainError> {
    let output: WhisperOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::Caption(format!("Malformed transcription output: {}", e)))?;

    Ok(output
        .transcription
        .into_iter()
        .filter(|segment| !segment.text.trim().is_empty())
        .map(|segment| TranscriptSegment {
            start: segment.offsets.from as f64 / 1000.0,
            end: segment.offsets.to as f64 / 1000.0,
            text: segment.text.trim().to_string(),
        })
        .collect())
}

/// Transcription service running whisper-cli on extracted 16 kHz mono audio
pub struct WhisperCliAdapter {
    program: Option<PathBuf>,
    ffmpeg: PathBuf,
    model_path: PathBuf,
    language: String,
}

impl WhisperCliAdapter {
    /// Create new adapter; a missing `program` makes every transcription fail
    pub fn new(
        program: Option<PathBuf>,
        ffmpeg: impl Into<PathBuf>,
        models_dir: &Path,
        tier: ModelTier,
        language: impl Into<String>,
    ) -> Self {
        Self {
            program,
            ffmpeg: ffmpeg.into(),
            model_path: models_dir.join(tier.file_name()),
            language: language.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    async fn extract_audio(&self, media: &Path, wav: &Path) -> Result<(), DomainError> {
        let args = FfmpegCommand::new(media, wav)
            .output_args(["-vn", "-ar", "16000", "-ac", "1", "-c:a", "pcm_s16le"])
            .build_args();

        let output = run_tool(&self.ffmpeg, &args)
            .await
            .map_err(|e| DomainError::Caption(format!("Failed to run ffmpeg: {}", e)))?;

        if !output.success() {
            return Err(DomainError::Caption(format!(
                "Audio extraction failed: {}",
                output.error_summary()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TranscribePort for WhisperCliAdapter {
    async fn transcribe(
        &self,
        media: &Path,
        artifacts: &ItemArtifacts,
    ) -> Result<Vec<TranscriptSegment>, DomainError> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| DomainError::Caption("whisper-cli not found in PATH".to_string()))?;

        if !self.model_path.is_file() {
            return Err(DomainError::Caption(format!(
                "Whisper model not found: {}",
                self.model_path.display()
            )));
        }

        self.extract_audio(media, &artifacts.audio).await?;

        // whisper-cli appends `.json` to the output prefix
        let prefix = artifacts.transcript.with_extension("");
        let args = vec![
            "-m".to_string(),
            self.model_path.to_string_lossy().to_string(),
            "-l".to_string(),
            self.language.clone(),
            "-oj".to_string(),
            "-of".to_string(),
            prefix.to_string_lossy().to_string(),
            "-f".to_string(),
            artifacts.audio.to_string_lossy().to_string(),
        ];

        debug!(language = %self.language, "Running whisper-cli");
        let output = run_tool(program, &args)
            .await
            .map_err(|e| DomainError::Caption(format!("Failed to run whisper-cli: {}", e)))?;

        if !output.success() {
            return Err(DomainError::Caption(format!(
                "Transcription failed: {}",
                output.error_summary()
            )));
        }

        let json = tokio::fs::read_to_string(&artifacts.transcript)
            .await
            .map_err(|e| DomainError::Caption(format!("Transcription output missing: {}", e)))?;

        let segments = parse_transcript(&json)?;
        if segments.is_empty() {
            return Err(DomainError::Caption("Transcription produced no speech".to_string()));
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tier_parse() {
        assert_eq!(ModelTier::parse("small").unwrap(), ModelTier::Small);
        assert_eq!(ModelTier::parse("Large-V3").unwrap(), ModelTier::LargeV3);
        assert!(ModelTier::parse("huge").is_err());
        assert_eq!(ModelTier::Medium.file_name(), "ggml-medium.bin");
        assert_eq!(ModelTier::Tiny.approx_size(), "75 MB");
    }

    #[test]
    fn test_parse_transcript() {
        let json = r#"{
            "systeminfo": "AVX = 1",
            "transcription": [
                {"timestamps": {"from": "00:00:00,000", "to": "00:00:02,500"}, "offsets": {"from": 0, "to": 2500}, "text": " Halo semuanya"},
                {"timestamps": {"from": "00:00:02,500", "to": "00:00:03,000"}, "offsets": {"from": 2500, "to": 3000}, "text": "  "},
                {"timestamps": {"from": "00:00:03,000", "to": "00:00:05,120"}, "offsets": {"from": 3000, "to": 5120}, "text": " apa kabar"}
            ]
        }"#;

        let segments = parse_transcript(json).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Halo semuanya");
        assert_eq!(segments[1].start, 3.0);
        assert_eq!(segments[1].end, 5.12);
    }

    #[test]
    fn test_parse_transcript_malformed() {
        assert!(matches!(parse_transcript("not json"), Err(DomainError::Caption(_))));
    }

    #[tokio::test]
    async fn test_missing_program_is_caption_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = WhisperCliAdapter::new(None, "ffmpeg", dir.path(), ModelTier::Small, "id");
        let artifacts = ArtifactArena::new(dir.path()).for_item(1);

        let result = adapter.transcribe(&artifacts.transcoded, &artifacts).await;

        assert!(matches!(result, Err(DomainError::Caption(_))));
        assert!(!artifacts.audio.exists());
    }
}
