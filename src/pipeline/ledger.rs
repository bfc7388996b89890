//! Stage ledger: completion bookkeeping backed by artifact existence.
//!
//! The ledger is read-only. It never creates the work directory; a missing
//! directory is a caller error and surfaces as an IO error.

use super::{Stage, WorkItem};
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Check whether a stage has completed for a lecture: true exactly when
/// `<dir>/<identifier>.<suffix>` exists, regardless of size or content.
pub fn is_complete(dir: &Path, identifier: &str, stage: Stage) -> Result<bool> {
    // Surface a missing work directory instead of silently reporting
    // everything pending.
    if !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("work directory does not exist: {}", dir.display()),
        )
        .into());
    }

    let artifact = dir.join(format!("{}.{}", identifier, stage.suffix()));
    Ok(artifact.exists())
}

/// Return the sub-sequence of `items` still lacking a completion artifact for
/// `stage`, preserving the input order. Skipped items are logged; the logging
/// is advisory only and has no effect on control flow.
pub fn filter_pending(items: &[WorkItem], dir: &Path, stage: Stage) -> Result<Vec<WorkItem>> {
    let mut pending = Vec::with_capacity(items.len());

    for item in items {
        if is_complete(dir, &item.identifier, stage)? {
            info!(
                "Skipping {} as {} exists",
                item.identifier,
                stage.suffix()
            );
        } else {
            pending.push(item.clone());
        }
    }

    Ok(pending)
}
