//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::error::Result;
use crate::openai::api_client;
use crate::rag::RagEngine;
use crate::vector_store::open_store;
use std::sync::Arc;

/// Run the ask command: one question, one answer, with cited sources.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    max_chunks: usize,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lectern doctor' for detailed diagnostics.");
        return Err(e);
    }

    let model = model.unwrap_or_else(|| settings.rag.model.clone());

    let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings)?);
    let store = open_store(&settings)?;

    let engine = RagEngine::new(
        api_client(&settings)?,
        store,
        embedder,
        &model,
        max_chunks,
        settings.rag.min_score,
    );

    let spinner = Output::spinner("Searching knowledge base...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();
            println!("\n{}\n", response.format_for_display());
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e)
        }
    }
}
