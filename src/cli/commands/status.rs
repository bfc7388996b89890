//! Status command: per-lecture stage completion.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::{build_batch, is_complete, Stage};

/// Show which stages have completed for each configured lecture.
pub fn run_status(urls: &[String], settings: Settings) -> Result<()> {
    let mut all_urls = settings.sources.urls.clone();
    all_urls.extend(urls.iter().cloned());
    let batch = build_batch(&all_urls)?;

    if batch.is_empty() {
        Output::warning("No lecture URLs configured or given.");
        return Ok(());
    }

    let work_dir = settings.work_dir();
    if !work_dir.is_dir() {
        Output::warning(&format!(
            "Work directory {} does not exist; nothing has run yet.",
            work_dir.display()
        ));
        return Ok(());
    }

    Output::header(&format!("Lectures ({})", work_dir.display()));

    for item in &batch {
        let stages = [Stage::Download, Stage::Transcribe, Stage::Summarize]
            .into_iter()
            .map(|stage| {
                is_complete(&work_dir, &item.identifier, stage)
                    .map(|done| (stage.suffix(), done))
            })
            .collect::<Result<Vec<_>>>()?;

        Output::stage_line(&item.identifier, &stages);
    }

    Ok(())
}
