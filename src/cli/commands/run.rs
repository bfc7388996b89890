//! Run command: the full pipeline followed by the query session.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::download::YtDlpDownloader;
use crate::error::Result;
use crate::indexer::VectorIndexer;
use crate::openai::api_client;
use crate::pipeline::{build_batch, PipelineDriver};
use crate::rag::{QuerySession, RagEngine};
use crate::transcription::WhisperCppTranscriber;
use std::sync::Arc;
use tracing::info;

/// Run the pipeline over the configured URLs plus `urls`, then (unless
/// `no_query`) enter the interactive query session.
pub async fn run_pipeline(urls: &[String], no_query: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Run, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lectern doctor' for detailed diagnostics.");
        return Err(e);
    }

    // The batch is immutable from here on: configured defaults first, then
    // command-line additions, identifiers extracted up front. A malformed URL
    // aborts before any backend is touched.
    let mut all_urls = settings.sources.urls.clone();
    all_urls.extend(urls.iter().cloned());
    let batch = build_batch(&all_urls)?;

    if batch.is_empty() {
        Output::warning("No lecture URLs configured or given; nothing to process.");
        return Ok(());
    }

    let work_dir = settings.work_dir();
    if !work_dir.exists() {
        info!("Creating work directory {}", work_dir.display());
        std::fs::create_dir_all(&work_dir)?;
    }

    let indexer = Arc::new(VectorIndexer::from_settings(&settings)?);
    let driver = PipelineDriver::new(
        work_dir,
        Arc::new(YtDlpDownloader::from_settings(&settings)?),
        Arc::new(WhisperCppTranscriber::from_settings(&settings)),
        indexer.clone(),
    );

    Output::info(&format!("Processing {} lecture(s)", batch.len()));
    let spinner = Output::spinner("Running pipeline...");
    let result = driver.run(&batch).await;
    spinner.finish_and_clear();

    let indexed = result?;
    Output::success(&format!("Pipeline complete, {} document(s) indexed", indexed));

    if no_query {
        return Ok(());
    }

    let engine = RagEngine::new(
        api_client(&settings)?,
        indexer.store(),
        indexer.embedder(),
        &settings.rag.model,
        settings.rag.max_context_chunks,
        settings.rag.min_score,
    );

    Output::info("Ask questions about your lectures. Type 'exit' to quit.");
    QuerySession::new(engine).run().await
}
