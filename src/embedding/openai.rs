//! OpenAI embedding backend.

use super::Embedder;
use crate::config::Settings;
use crate::error::{LecternError, Result};
use crate::openai::api_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// How many inputs go into a single embeddings request.
const REQUEST_BATCH: usize = 100;

/// Embedder backed by the OpenAI embeddings API.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Build the embedder from the `[embedding]` settings section.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: api_client(settings)?,
            model: settings.embedding.model.clone(),
            dimensions: settings.embedding.dimensions as usize,
        })
    }

    /// One embeddings API call over `inputs`, returned in input order.
    async fn request_embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(inputs.to_vec()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| LecternError::Embedding(format!("bad embedding request: {e}")))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| LecternError::OpenAI(format!("embeddings request failed: {e}")))?;

        if response.data.len() != inputs.len() {
            return Err(LecternError::Embedding(format!(
                "expected {} embedding(s), got {}",
                inputs.len(),
                response.data.len()
            )));
        }

        // The API does not guarantee response order.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip_all)]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = [text.to_string()];
        self.request_embeddings(&inputs)
            .await?
            .pop()
            .ok_or_else(|| LecternError::Embedding("empty embedding response".to_string()))
    }

    #[instrument(skip_all, fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(REQUEST_BATCH) {
            embeddings.extend(self.request_embeddings(batch).await?);
        }
        debug!("Embedded {} text(s)", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_reads_embedding_section() {
        let mut settings = Settings::default();
        settings.embedding.model = "text-embedding-3-large".to_string();
        settings.embedding.dimensions = 3072;

        let embedder = OpenAIEmbedder::from_settings(&settings).unwrap();
        assert_eq!(embedder.dimensions(), 3072);
        assert_eq!(embedder.model, "text-embedding-3-large");
    }
}
