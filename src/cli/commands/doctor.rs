//! Doctor command: diagnose tools, credentials, and configuration.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::vector_store::{open_store, VectorStore};

/// Run all diagnostics and report what's missing. Always exits zero; the
/// point is the report, not the status code.
pub async fn run_doctor(settings: Settings) -> Result<()> {
    Output::header("External tools");
    report_check("yt-dlp", preflight::check_tool("yt-dlp"));
    report_check(
        &settings.transcription.binary,
        preflight::check_tool(&settings.transcription.binary),
    );

    Output::header("Credentials");
    report_check("OPENAI_API_KEY", preflight::check_api_key());
    let cookies = settings.cookies_file();
    if cookies.exists() {
        Output::success(&format!("cookies file: {}", cookies.display()));
    } else {
        Output::error(&format!("cookies file missing: {}", cookies.display()));
    }

    Output::header("Configuration");
    Output::kv("config path", &Settings::default_config_path().display().to_string());
    Output::kv("work dir", &settings.work_dir().display().to_string());
    Output::kv("model path", &settings.model_path().display().to_string());
    if !settings.model_path().exists() {
        Output::warning("transcription model file not found");
    }
    Output::kv(
        "default lectures",
        &settings.sources.urls.len().to_string(),
    );

    Output::header("Index");
    match open_store(&settings) {
        Ok(store) => {
            Output::kv("provider", &settings.vector_store.provider);
            Output::kv("path", &settings.sqlite_path().display().to_string());
            Output::kv("documents", &store.document_count().await?.to_string());
            let lectures = store.list_lectures().await?;
            Output::kv("indexed lectures", &lectures.len().to_string());
            for lecture in lectures {
                Output::list_item(&format!(
                    "{} ({} chunk(s), indexed {})",
                    lecture.lecture_id,
                    lecture.chunk_count,
                    lecture.indexed_at.format("%Y-%m-%d %H:%M")
                ));
            }
        }
        Err(e) => {
            Output::error(&format!("vector store unavailable: {}", e));
        }
    }

    Ok(())
}

fn report_check(name: &str, result: Result<()>) {
    match result {
        Ok(()) => Output::success(name),
        Err(e) => Output::error(&format!("{}: {}", name, e)),
    }
}
