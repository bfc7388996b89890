//! Configuration module for Lectern.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DownloadSettings, EmbeddingSettings, GeneralSettings, IndexingSettings, RagSettings, Settings,
    SourceSettings, TranscriptionSettings, VectorStoreSettings,
};
