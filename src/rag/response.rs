//! RAG response generation.

use super::{context::format_context_for_prompt, ContextBuilder, ContextChunk};
use crate::embedding::Embedder;
use crate::error::{LecternError, Result};
use crate::vector_store::VectorStore;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// System prompt for answering questions over lecture transcripts.
const RAG_SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions \
about recorded lectures. Answer using only the provided transcript excerpts. \
If the excerpts do not contain the answer, say so. Cite lecture ids when relevant.";

/// RAG engine for question answering.
pub struct RagEngine {
    client: Client<OpenAIConfig>,
    model: String,
    context_builder: ContextBuilder,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(
        client: Client<OpenAIConfig>,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        model: &str,
        max_context_chunks: usize,
        min_score: f32,
    ) -> Self {
        let context_builder = ContextBuilder::new(vector_store, embedder)
            .with_max_chunks(max_context_chunks)
            .with_min_score(min_score);

        Self {
            client,
            model: model.to_string(),
            context_builder,
        }
    }

    /// Ask a single question and get a response with sources.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        let context_chunks = self.context_builder.build(question).await?;

        if context_chunks.is_empty() {
            return Ok(RagResponse {
                answer: "I couldn't find any relevant information in your lecture library for this question.".to_string(),
                sources: Vec::new(),
            });
        }

        let context_text = format_context_for_prompt(&context_chunks);
        let user_prompt = format!(
            "Question: {}\n\nRelevant excerpts from lecture transcripts:\n{}",
            question, context_text
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(RAG_SYSTEM_PROMPT)
                .build()
                .map_err(|e| LecternError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| LecternError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| LecternError::Rag(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LecternError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| LecternError::Rag("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated response with {} sources", context_chunks.len());

        Ok(RagResponse {
            answer,
            sources: context_chunks,
        })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<ContextChunk>,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\nlecture {} (score: {:.2})",
                    source.lecture_id, source.score
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_for_display_with_sources() {
        let response = RagResponse {
            answer: "The answer.".to_string(),
            sources: vec![ContextChunk {
                lecture_id: "lec1".to_string(),
                content: "chunk".to_string(),
                score: 0.87,
            }],
        };

        let display = response.format_for_display();
        assert!(display.starts_with("The answer."));
        assert!(display.contains("lecture lec1 (score: 0.87)"));
    }

    #[test]
    fn test_format_for_display_without_sources() {
        let response = RagResponse {
            answer: "No idea.".to_string(),
            sources: Vec::new(),
        };
        assert_eq!(response.format_for_display(), "No idea.");
    }
}
