//! RAG (Retrieval-Augmented Generation) for question answering over the
//! lecture knowledge base.

mod context;
mod response;
mod session;

pub use context::ContextBuilder;
pub use response::{RagEngine, RagResponse};
pub use session::QuerySession;

use crate::vector_store::SearchResult;

/// A retrieved chunk formatted for prompting and display.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Lecture identifier.
    pub lecture_id: String,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            lecture_id: result.document.lecture_id.clone(),
            content: result.document.content.clone(),
            score: result.score,
        }
    }
}
