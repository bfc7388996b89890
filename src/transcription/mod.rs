//! Speech-to-text backend.
//!
//! The transcription tool is an external process wrapped behind the
//! [`Transcriber`] trait so the pipeline can be exercised with a fake. The
//! real implementation shells out to whisper-cpp.

mod whisper;

pub use whisper::WhisperCppTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Raw output files produced by a transcription run, still under the tool's
/// own naming. The pipeline driver moves them into the artifact convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOutput {
    /// Subtitle-format output (SRT).
    pub subtitle_path: PathBuf,
    /// Plain-text output.
    pub text_path: PathBuf,
}

/// Trait for transcription backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio file, returning the paths of the output files the
    /// tool produced, or an error if the tool failed or left no output.
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionOutput>;
}
