//! Configuration settings for Lectern.
//!
//! Settings are loaded once at startup and passed by reference from there on;
//! nothing mutates them in place. The batch for a run is built from
//! `sources.urls` plus command-line additions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub sources: SourceSettings,
    pub download: DownloadSettings,
    pub transcription: TranscriptionSettings,
    pub embedding: EmbeddingSettings,
    pub indexing: IndexingSettings,
    pub vector_store: VectorStoreSettings,
    pub rag: RagSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Work directory holding per-lecture stage artifacts.
    pub work_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Timeout for OpenAI API requests, in seconds.
    pub api_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            work_dir: "lectures".to_string(),
            log_level: "info".to_string(),
            api_timeout_secs: 300,
        }
    }
}

/// Default lecture URLs processed on every run, before CLI additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SourceSettings {
    pub urls: Vec<String>,
}

/// Download backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Netscape-format cookies file for the lecture platform session.
    pub cookies_file: String,
    /// yt-dlp format selector. Audio quality is unaffected by "worst".
    pub format: String,
    /// Output sample rate in Hz. whisper-cpp requires 16000.
    pub sample_rate: u32,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            cookies_file: "cookies.txt".to_string(),
            format: "worst".to_string(),
            sample_rate: 16000,
        }
    }
}

/// Transcription backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Name or path of the whisper-cpp binary.
    pub binary: String,
    /// Path to the ggml model file.
    pub model_path: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            binary: "whisper-cpp".to_string(),
            model_path: "models/tiny.en.bin".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Maximum characters per embedded chunk of a transcript.
    pub max_chunk_chars: usize,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            max_chunk_chars: 4000,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.lectern/vectors.db".to_string(),
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Maximum number of context chunks to include.
    pub max_context_chunks: usize,
    /// Minimum similarity score for retrieved chunks (0.0-1.0).
    pub min_score: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_context_chunks: 10,
            min_score: 0.3,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lectern")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded work directory path.
    pub fn work_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.work_dir)
    }

    /// Get the expanded cookies file path.
    pub fn cookies_file(&self) -> PathBuf {
        Self::expand_path(&self.download.cookies_file)
    }

    /// Get the expanded transcription model path.
    pub fn model_path(&self) -> PathBuf {
        Self::expand_path(&self.transcription.model_path)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.work_dir, "lectures");
        assert_eq!(settings.general.api_timeout_secs, 300);
        assert_eq!(settings.download.sample_rate, 16000);
        assert_eq!(settings.transcription.binary, "whisper-cpp");
        assert!(settings.sources.urls.is_empty());
    }

    #[test]
    fn test_partial_toml_round_trip() {
        let toml_str = r#"
            [general]
            work_dir = "/tmp/lectures"

            [sources]
            urls = ["https://host/Viewer.aspx?id=abc"]
        "#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.general.work_dir, "/tmp/lectures");
        assert_eq!(settings.sources.urls.len(), 1);
        // Unspecified sections fall back to defaults.
        assert_eq!(settings.download.format, "worst");
        assert_eq!(settings.rag.max_context_chunks, 10);
    }
}
