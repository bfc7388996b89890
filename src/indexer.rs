//! Builds the vector index from transcript artifacts.
//!
//! Indexing is a full rebuild: every transcript in the work directory is
//! loaded, chunked, embedded, and upserted, regardless of which run produced
//! it. Per lecture, existing documents are replaced so re-indexing never
//! duplicates chunks.

use crate::config::Settings;
use crate::documents::{load_transcripts, split_text};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::pipeline::Indexer;
use crate::vector_store::{open_store, Document, VectorStore};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Indexer backed by an embedder and a vector store.
pub struct VectorIndexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    max_chunk_chars: usize,
}

impl VectorIndexer {
    /// Build the default indexer from settings: OpenAI embeddings over the
    /// configured vector store.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::from_settings(settings)?);
        let store = open_store(settings)?;

        Ok(Self::with_components(
            embedder,
            store,
            settings.indexing.max_chunk_chars,
        ))
    }

    /// Build an indexer from explicit components.
    pub fn with_components(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            max_chunk_chars,
        }
    }

    /// The vector store this indexer writes to.
    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// The embedder this indexer uses.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }
}

#[async_trait]
impl Indexer for VectorIndexer {
    #[instrument(skip(self), fields(work_dir = %work_dir.display()))]
    async fn index(&self, work_dir: &Path) -> Result<usize> {
        info!("Loading documents");
        let transcripts = load_transcripts(work_dir)?;

        if transcripts.is_empty() {
            warn!("No transcripts found in {}", work_dir.display());
            return Ok(0);
        }

        info!("Creating index from {} transcript(s)", transcripts.len());

        let mut total = 0;
        for transcript in &transcripts {
            let chunks = split_text(&transcript.content, self.max_chunk_chars);
            if chunks.is_empty() {
                warn!("Transcript {} is empty, skipping", transcript.lecture_id);
                continue;
            }

            let embeddings = self.embedder.embed_batch(&chunks).await?;

            let documents: Vec<Document> = chunks
                .into_iter()
                .zip(embeddings)
                .enumerate()
                .map(|(order, (content, embedding))| {
                    Document::new(
                        transcript.lecture_id.clone(),
                        content,
                        embedding,
                        order as i32,
                    )
                })
                .collect();

            // Replace rather than append so rebuilds stay idempotent.
            self.store.delete_by_lecture_id(&transcript.lecture_id).await?;
            total += self.store.upsert_batch(&documents).await?;
        }

        Ok(total)
    }
}
