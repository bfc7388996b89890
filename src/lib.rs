//! Lectern - Lecture Pipeline and RAG
//!
//! A CLI tool that turns recorded lecture URLs into a queryable knowledge base.
//!
//! # Overview
//!
//! Lectern runs a three-stage pipeline over a batch of lecture URLs:
//!
//! 1. Download the audio with yt-dlp
//! 2. Transcribe it with whisper-cpp
//! 3. Embed and index the transcripts for retrieval-augmented querying
//!
//! The pipeline is stateless but resumable: the work directory is the single
//! source of truth for what has been done. Each stage leaves one artifact per
//! lecture (`<id>.wav`, `<id>.transcript`, ...), and a stage is considered
//! complete for a lecture exactly when its artifact exists. Re-running over an
//! unchanged directory is safe and cheap because every stage re-derives its
//! pending set from disk.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `pipeline` - Stage ledger and pipeline driver (the core)
//! - `download` - Audio download backend (yt-dlp)
//! - `transcription` - Speech-to-text backend (whisper-cpp)
//! - `documents` - Transcript loading and text chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `indexer` - Builds the index from transcript artifacts
//! - `rag` - Query answering and the interactive session
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lectern::config::Settings;
//! use lectern::download::YtDlpDownloader;
//! use lectern::indexer::VectorIndexer;
//! use lectern::pipeline::{build_batch, PipelineDriver};
//! use lectern::transcription::WhisperCppTranscriber;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let batch = build_batch(&settings.sources.urls)?;
//!
//!     let driver = PipelineDriver::new(
//!         settings.work_dir(),
//!         Arc::new(YtDlpDownloader::from_settings(&settings)?),
//!         Arc::new(WhisperCppTranscriber::from_settings(&settings)),
//!         Arc::new(VectorIndexer::from_settings(&settings)?),
//!     );
//!     driver.run(&batch).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod documents;
pub mod download;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod pipeline;
pub mod rag;
pub mod transcription;
pub mod vector_store;

pub use error::{LecternError, Result};
