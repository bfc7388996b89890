//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, Document, IndexedLecture, SearchResult, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().unwrap();
        for doc in docs {
            store.insert(doc.id.to_string(), doc.clone());
        }
        Ok(docs.len())
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().unwrap();

        let mut results: Vec<SearchResult> = docs
            .values()
            .map(|doc| {
                let score = cosine_similarity(query_embedding, &doc.embedding);
                SearchResult {
                    document: doc.clone(),
                    score,
                }
            })
            .filter(|r| r.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_by_lecture_id(&self, lecture_id: &str) -> Result<usize> {
        let mut docs = self.documents.write().unwrap();
        let initial_len = docs.len();
        docs.retain(|_, doc| doc.lecture_id != lecture_id);
        Ok(initial_len - docs.len())
    }

    async fn list_lectures(&self) -> Result<Vec<IndexedLecture>> {
        let docs = self.documents.read().unwrap();

        let mut lecture_map: HashMap<String, IndexedLecture> = HashMap::new();

        for doc in docs.values() {
            let entry = lecture_map
                .entry(doc.lecture_id.clone())
                .or_insert_with(|| IndexedLecture {
                    lecture_id: doc.lecture_id.clone(),
                    chunk_count: 0,
                    indexed_at: doc.indexed_at,
                });

            entry.chunk_count += 1;
            if doc.indexed_at > entry.indexed_at {
                entry.indexed_at = doc.indexed_at;
            }
        }

        let mut lectures: Vec<IndexedLecture> = lecture_map.into_values().collect();
        lectures.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(lectures)
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().unwrap();
        Ok(docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let doc1 = Document::new("lec1".to_string(), "Hello world".to_string(), vec![1.0, 0.0, 0.0], 0);
        let doc2 = Document::new("lec1".to_string(), "Goodbye world".to_string(), vec![0.0, 1.0, 0.0], 1);

        store.upsert_batch(&[doc1, doc2]).await.unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search_with_threshold(&[1.0, 0.0, 0.0], 10, 0.0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let lectures = store.list_lectures().await.unwrap();
        assert_eq!(lectures.len(), 1);
        assert_eq!(lectures[0].chunk_count, 2);

        assert_eq!(store.delete_by_lecture_id("lec1").await.unwrap(), 2);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }
}
