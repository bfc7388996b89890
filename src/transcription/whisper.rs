//! whisper-cpp transcription implementation.

use super::{Transcriber, TranscriptionOutput};
use crate::config::Settings;
use crate::error::{LecternError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Transcriber that invokes the whisper-cpp binary.
///
/// whisper-cpp writes its outputs as siblings of the input file, named
/// `<input>.srt` and `<input>.txt`.
pub struct WhisperCppTranscriber {
    binary: String,
    model_path: PathBuf,
}

impl WhisperCppTranscriber {
    pub fn new(binary: &str, model_path: &Path) -> Self {
        Self {
            binary: binary.to_string(),
            model_path: model_path.to_path_buf(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.transcription.binary,
            &settings.model_path(),
        )
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionOutput> {
        info!("Transcribing {}", audio_path.display());

        let result = Command::new(&self.binary)
            .arg("-osrt")
            .arg("-otxt")
            .arg("-m")
            .arg(&self.model_path)
            .arg(audio_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LecternError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(LecternError::Transcription(format!(
                    "{} execution failed: {e}",
                    self.binary
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LecternError::ToolFailed(format!(
                "{} failed on {}: {stderr}",
                self.binary,
                audio_path.display()
            )));
        }

        let subtitle_path = sibling_output(audio_path, "srt");
        let text_path = sibling_output(audio_path, "txt");

        // The tool exiting zero without leaving its outputs is still a failure.
        for path in [&subtitle_path, &text_path] {
            if !path.exists() {
                return Err(LecternError::Transcription(format!(
                    "{} produced no output at {}",
                    self.binary,
                    path.display()
                )));
            }
        }

        debug!("Transcription outputs: {:?}, {:?}", subtitle_path, text_path);

        Ok(TranscriptionOutput {
            subtitle_path,
            text_path,
        })
    }
}

/// whisper-cpp appends its extension to the full input name, e.g.
/// `lec.wav` -> `lec.wav.srt`.
fn sibling_output(audio_path: &Path, ext: &str) -> PathBuf {
    let mut name = audio_path.as_os_str().to_os_string();
    name.push(format!(".{ext}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_output_naming() {
        let audio = Path::new("/work/lec1.wav");
        assert_eq!(
            sibling_output(audio, "srt"),
            PathBuf::from("/work/lec1.wav.srt")
        );
        assert_eq!(
            sibling_output(audio, "txt"),
            PathBuf::from("/work/lec1.wav.txt")
        );
    }
}
