//! Pipeline driver: sequences the stages over a batch of lectures.
//!
//! The driver holds no persisted state of its own. Per stage it asks the
//! ledger which lectures are pending, hands only those to the stage's backend,
//! and relies on the backend depositing an artifact the ledger will recognize
//! on the next run. Backend failures propagate and abort the run; recovery is
//! re-running the driver, which skips whatever already completed.

use super::{filter_pending, Stage, WorkItem};
use crate::download::DownloadBackend;
use crate::error::{LecternError, Result};
use crate::transcription::Transcriber;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Index-building backend: consumes every transcript artifact in the work
/// directory and returns the number of documents indexed.
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn index(&self, work_dir: &Path) -> Result<usize>;
}

/// Drives the download -> transcribe -> index pipeline.
pub struct PipelineDriver {
    work_dir: PathBuf,
    downloader: Arc<dyn DownloadBackend>,
    transcriber: Arc<dyn Transcriber>,
    indexer: Arc<dyn Indexer>,
}

impl PipelineDriver {
    pub fn new(
        work_dir: PathBuf,
        downloader: Arc<dyn DownloadBackend>,
        transcriber: Arc<dyn Transcriber>,
        indexer: Arc<dyn Indexer>,
    ) -> Self {
        Self {
            work_dir,
            downloader,
            transcriber,
            indexer,
        }
    }

    /// Run the full pipeline over `batch`.
    ///
    /// Stages run strictly in order. Each stage re-derives its pending set
    /// from the artifact store, so a second run over an unchanged directory
    /// performs no backend work.
    #[instrument(skip_all, fields(batch = batch.len()))]
    pub async fn run(&self, batch: &[WorkItem]) -> Result<usize> {
        // A lecture with a transcript needs neither download nor re-download,
        // even if its raw audio was deleted. A lecture with audio but no
        // transcript is treated as a failed transcription attempt and is NOT
        // re-downloaded, but also not re-transcribed this run; deleting the
        // wav forces both.
        let pending_transcribe = filter_pending(batch, &self.work_dir, Stage::Transcribe)?;
        let pending_download = filter_pending(&pending_transcribe, &self.work_dir, Stage::Download)?;

        info!(
            "Pipeline: {} lecture(s), {} to transcribe, {} to download",
            batch.len(),
            pending_transcribe.len(),
            pending_download.len()
        );

        // One call for the whole set; the backend handles its own batching and
        // is best-effort per item. A lecture that fails to download leaves no
        // wav and stays pending for the next run.
        self.downloader
            .download(&pending_download, &self.work_dir)
            .await?;
        info!("Finished downloading");

        // Transcription is serialized: the backend is a CPU-bound external
        // process and we assume at most one instance at a time. Only lectures
        // downloaded this run are transcribed.
        for item in &pending_download {
            self.transcribe_one(item).await?;
        }
        info!("Finished transcribing");

        // The pending set for the final stage is advisory: indexing is a full
        // rebuild from every transcript on disk, whichever run produced it.
        // Nothing currently deposits a .summary artifact, so this set always
        // equals the batch; it is logged for visibility only.
        let pending_index = filter_pending(batch, &self.work_dir, Stage::Summarize)?;
        info!("{} lecture(s) without a summary artifact", pending_index.len());

        let indexed = self.indexer.index(&self.work_dir).await?;
        info!("Indexed {} document(s)", indexed);

        Ok(indexed)
    }

    /// Transcribe a single downloaded lecture and move the backend's raw
    /// outputs into the artifact naming convention.
    #[instrument(skip(self), fields(identifier = %item.identifier))]
    async fn transcribe_one(&self, item: &WorkItem) -> Result<()> {
        let audio_path = self
            .work_dir
            .join(format!("{}.{}", item.identifier, Stage::Download.suffix()));

        let output = self.transcriber.transcribe(&audio_path).await?;

        // The rename is the commit point: until the .transcript file exists
        // under its final name, the ledger treats the stage as pending.
        let subtitle_dest = self.work_dir.join(format!("{}.srt", item.identifier));
        let transcript_dest = self
            .work_dir
            .join(format!("{}.{}", item.identifier, Stage::Transcribe.suffix()));

        std::fs::rename(&output.subtitle_path, &subtitle_dest).map_err(|e| {
            LecternError::Transcription(format!(
                "failed to move {} into place: {}",
                output.subtitle_path.display(),
                e
            ))
        })?;
        std::fs::rename(&output.text_path, &transcript_dest).map_err(|e| {
            LecternError::Transcription(format!(
                "failed to move {} into place: {}",
                output.text_path.display(),
                e
            ))
        })?;

        info!("Transcribed {}", item.identifier);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::TRANSCRIPT_SUFFIX;
    use crate::transcription::TranscriptionOutput;
    use std::sync::Mutex;

    fn item(id: &str) -> WorkItem {
        WorkItem {
            source_url: format!("https://host/v?id={}", id),
            identifier: id.to_string(),
        }
    }

    /// Records every call and deposits a wav per item, like yt-dlp would.
    #[derive(Default)]
    struct FakeDownloader {
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl DownloadBackend for FakeDownloader {
        async fn download(&self, items: &[WorkItem], work_dir: &Path) -> Result<()> {
            let ids: Vec<String> = items.iter().map(|i| i.identifier.clone()).collect();
            for id in &ids {
                std::fs::write(work_dir.join(format!("{}.wav", id)), b"audio")?;
            }
            self.calls.lock().unwrap().push(ids);
            Ok(())
        }
    }

    /// Deposits sibling .srt/.txt files next to the input, like whisper-cpp.
    #[derive(Default)]
    struct FakeTranscriber {
        calls: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionOutput> {
            self.calls.lock().unwrap().push(audio_path.to_path_buf());
            if self.fail {
                return Err(LecternError::ToolFailed("whisper-cpp exited 1".into()));
            }
            let subtitle_path = audio_path.with_extension("wav.srt");
            let text_path = audio_path.with_extension("wav.txt");
            std::fs::write(&subtitle_path, b"1\n00:00:00,000 --> 00:00:01,000\nhi\n")?;
            std::fs::write(&text_path, b"hi")?;
            Ok(TranscriptionOutput {
                subtitle_path,
                text_path,
            })
        }
    }

    #[derive(Default)]
    struct FakeIndexer {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Indexer for FakeIndexer {
        async fn index(&self, work_dir: &Path) -> Result<usize> {
            *self.calls.lock().unwrap() += 1;
            let count = std::fs::read_dir(work_dir)?
                .flatten()
                .filter(|e| {
                    e.path()
                        .extension()
                        .is_some_and(|ext| ext == TRANSCRIPT_SUFFIX)
                })
                .count();
            Ok(count)
        }
    }

    struct Harness {
        dir: tempfile::TempDir,
        downloader: Arc<FakeDownloader>,
        transcriber: Arc<FakeTranscriber>,
        indexer: Arc<FakeIndexer>,
        driver: PipelineDriver,
    }

    fn harness(failing_transcriber: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Arc::new(FakeDownloader::default());
        let transcriber = Arc::new(FakeTranscriber {
            fail: failing_transcriber,
            ..Default::default()
        });
        let indexer = Arc::new(FakeIndexer::default());
        let driver = PipelineDriver::new(
            dir.path().to_path_buf(),
            downloader.clone(),
            transcriber.clone(),
            indexer.clone(),
        );
        Harness {
            dir,
            downloader,
            transcriber,
            indexer,
            driver,
        }
    }

    #[tokio::test]
    async fn test_empty_work_dir_runs_all_stages() {
        let h = harness(false);
        let batch = vec![item("id1")];

        let indexed = h.driver.run(&batch).await.unwrap();

        assert_eq!(
            *h.downloader.calls.lock().unwrap(),
            vec![vec!["id1".to_string()]]
        );
        assert_eq!(h.transcriber.calls.lock().unwrap().len(), 1);
        assert!(h.dir.path().join("id1.transcript").exists());
        assert!(h.dir.path().join("id1.srt").exists());
        assert_eq!(*h.indexer.calls.lock().unwrap(), 1);
        assert_eq!(indexed, 1);
    }

    #[tokio::test]
    async fn test_existing_transcript_skips_download_and_transcribe() {
        let h = harness(false);
        std::fs::write(h.dir.path().join("id1.transcript"), b"done").unwrap();
        let batch = vec![item("id1")];

        h.driver.run(&batch).await.unwrap();

        // Download backend is invoked once, with nothing to do.
        assert_eq!(
            *h.downloader.calls.lock().unwrap(),
            vec![Vec::<String>::new()]
        );
        assert!(h.transcriber.calls.lock().unwrap().is_empty());
        // Indexing still consumes the pre-existing transcript.
        assert_eq!(*h.indexer.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_transcript_without_wav_is_not_redownloaded() {
        let h = harness(false);
        std::fs::write(h.dir.path().join("id1.transcript"), b"done").unwrap();
        let batch = vec![item("id1"), item("id2")];

        h.driver.run(&batch).await.unwrap();

        // id1 has a transcript, so it is excluded from the download pending
        // set even though no id1.wav exists.
        assert_eq!(
            *h.downloader.calls.lock().unwrap(),
            vec![vec!["id2".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_second_run_does_no_backend_work() {
        let h = harness(false);
        let batch = vec![item("id1"), item("id2")];

        h.driver.run(&batch).await.unwrap();
        h.driver.run(&batch).await.unwrap();

        let download_calls = h.downloader.calls.lock().unwrap();
        assert_eq!(download_calls.len(), 2);
        assert!(download_calls[1].is_empty());
        assert_eq!(h.transcriber.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_transcription_failure_aborts_and_is_retried() {
        let h = harness(true);
        let batch = vec![item("id1")];

        assert!(h.driver.run(&batch).await.is_err());

        // The wav remains; no transcript was committed; indexing never ran.
        assert!(h.dir.path().join("id1.wav").exists());
        assert!(!h.dir.path().join("id1.transcript").exists());
        assert_eq!(*h.indexer.calls.lock().unwrap(), 0);

        // The next run still sees id1 as pending for transcription.
        let pending =
            filter_pending(&batch, h.dir.path(), Stage::Transcribe).unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_wav_without_transcript_is_left_alone() {
        // A pre-existing wav with no transcript is excluded from the download
        // pending set, and only freshly downloaded lectures are transcribed.
        // Deleting the wav is the manual recovery path.
        let h = harness(false);
        std::fs::write(h.dir.path().join("id1.wav"), b"audio").unwrap();
        let batch = vec![item("id1")];

        h.driver.run(&batch).await.unwrap();

        assert_eq!(
            *h.downloader.calls.lock().unwrap(),
            vec![Vec::<String>::new()]
        );
        assert!(h.transcriber.calls.lock().unwrap().is_empty());
        assert!(!h.dir.path().join("id1.transcript").exists());
    }
}
