//! Pipeline core for Lectern.
//!
//! A lecture moves through three stages, each of which deposits exactly one
//! artifact in the work directory, named `<identifier>.<suffix>`. The mere
//! existence of that file is the completion signal for the stage: there is no
//! content validation, no checksum, and no timestamp comparison. A truncated
//! artifact therefore reads as complete; the fix is deleting it and re-running.
//!
//! At most one Lectern process may operate on a work directory at a time.
//! There is no cross-process locking.

mod driver;
mod ledger;

pub use driver::{Indexer, PipelineDriver};
pub use ledger::{filter_pending, is_complete};

use crate::error::{LecternError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Pipeline stages, in execution order. Each stage carries the file extension
/// of its completion artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Transcribe,
    Summarize,
}

impl Stage {
    /// Completion artifact extension for this stage.
    pub fn suffix(&self) -> &'static str {
        match self {
            Stage::Download => "wav",
            Stage::Transcribe => "transcript",
            Stage::Summarize => "summary",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Download => write!(f, "download"),
            Stage::Transcribe => write!(f, "transcribe"),
            Stage::Summarize => write!(f, "summarize"),
        }
    }
}

/// A single lecture to process. The identifier is extracted from the source
/// URL once, at batch construction, and names every artifact for the lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Original lecture URL, passed through to the download backend.
    pub source_url: String,
    /// Stable, filesystem-safe key derived from the URL.
    pub identifier: String,
}

impl WorkItem {
    /// Build a work item from a lecture URL, extracting its identifier.
    pub fn from_url(url: &str) -> Result<Self> {
        let identifier = extract_identifier(url)?;
        Ok(Self {
            source_url: url.to_string(),
            identifier,
        })
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid regex"))
}

/// Extract the lecture identifier from a viewer URL.
///
/// Lecture platforms put the recording id in an `id` query parameter
/// (e.g. `.../Viewer.aspx?id=df62a33f-...`). Extraction is pure and
/// deterministic; a URL without a usable `id` parameter fails with
/// [`LecternError::MalformedUrl`], never with partial output. Distinct URLs
/// are not guaranteed distinct identifiers.
pub fn extract_identifier(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|_| LecternError::MalformedUrl(url.to_string()))?;

    let id = parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LecternError::MalformedUrl(url.to_string()))?;

    // Identifiers name files on disk, so restrict them to safe characters.
    if !identifier_regex().is_match(&id) {
        return Err(LecternError::MalformedUrl(url.to_string()));
    }

    Ok(id)
}

/// Build the immutable batch for a run from the configured default URLs plus
/// any command-line additions, in that order. Fails before any backend is
/// touched if any URL is malformed.
pub fn build_batch<S: AsRef<str>>(urls: &[S]) -> Result<Vec<WorkItem>> {
    urls.iter().map(|u| WorkItem::from_url(u.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_identifier() {
        let url = "https://umd.hosted.panopto.com/Panopto/Pages/Viewer.aspx?id=df62a33f-4d8b-438d-bca9-b14000e1b249";
        assert_eq!(
            extract_identifier(url).unwrap(),
            "df62a33f-4d8b-438d-bca9-b14000e1b249"
        );
    }

    #[test]
    fn test_extract_is_deterministic() {
        let url = "https://host/Viewer.aspx?foo=bar&id=abc-123";
        assert_eq!(
            extract_identifier(url).unwrap(),
            extract_identifier(url).unwrap()
        );
    }

    #[test]
    fn test_extract_rejects_missing_id() {
        assert!(matches!(
            extract_identifier("https://host/path?noid=x"),
            Err(LecternError::MalformedUrl(_))
        ));
        assert!(matches!(
            extract_identifier("https://host/path"),
            Err(LecternError::MalformedUrl(_))
        ));
        assert!(matches!(
            extract_identifier("https://host/path?id="),
            Err(LecternError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_extract_rejects_unsafe_identifier() {
        assert!(matches!(
            extract_identifier("https://host/path?id=../../etc/passwd"),
            Err(LecternError::MalformedUrl(_))
        ));
        assert!(matches!(
            extract_identifier("not a url at all"),
            Err(LecternError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_stage_suffixes() {
        assert_eq!(Stage::Download.suffix(), "wav");
        assert_eq!(Stage::Transcribe.suffix(), "transcript");
        assert_eq!(Stage::Summarize.suffix(), "summary");
    }

    #[test]
    fn test_build_batch_preserves_order() {
        let batch = build_batch(&[
            "https://host/v?id=first",
            "https://host/v?id=second",
        ])
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].identifier, "first");
        assert_eq!(batch[1].identifier, "second");
    }

    #[test]
    fn test_build_batch_fails_on_any_malformed_url() {
        let result = build_batch(&["https://host/v?id=ok", "https://host/v?noid=x"]);
        assert!(result.is_err());
    }
}
