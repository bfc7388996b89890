//! Audio download backend.
//!
//! Downloads lecture audio using yt-dlp. The backend receives the whole
//! pending set in one call and lets yt-dlp handle per-item sequencing; a
//! lecture that fails to download is skipped (best-effort) and simply stays
//! pending on the next run.

use crate::config::Settings;
use crate::error::{LecternError, Result};
use crate::pipeline::WorkItem;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Trait for the download backend.
///
/// On success, one `<identifier>.wav` artifact exists in `work_dir` for each
/// lecture that downloaded cleanly.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    async fn download(&self, items: &[WorkItem], work_dir: &Path) -> Result<()>;
}

/// yt-dlp based downloader.
pub struct YtDlpDownloader {
    cookies_file: PathBuf,
    format: String,
    sample_rate: u32,
}

impl YtDlpDownloader {
    /// Build a downloader from settings, verifying the cookies file exists.
    ///
    /// The lecture platform requires session cookies; a missing cookies file
    /// would fail every download, so it is rejected up front.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let cookies_file = settings.cookies_file();
        if !cookies_file.exists() {
            return Err(LecternError::MissingCredential(format!(
                "cookies file not found: {}",
                cookies_file.display()
            )));
        }

        Ok(Self {
            cookies_file,
            format: settings.download.format.clone(),
            sample_rate: settings.download.sample_rate,
        })
    }
}

#[async_trait]
impl DownloadBackend for YtDlpDownloader {
    #[instrument(skip_all, fields(count = items.len()))]
    async fn download(&self, items: &[WorkItem], work_dir: &Path) -> Result<()> {
        if items.is_empty() {
            debug!("Nothing to download");
            return Ok(());
        }

        info!("Downloading {} lecture(s)", items.len());

        // yt-dlp names outputs by its own extracted id, which for viewer URLs
        // is the same id= parameter the pipeline keys artifacts on.
        let template = work_dir.join("%(id)s.%(ext)s");
        let template = template.to_str().ok_or_else(|| {
            LecternError::Download(format!(
                "work directory path is not valid UTF-8: {}",
                work_dir.display()
            ))
        })?;

        let mut cmd = Command::new("yt-dlp");
        cmd.arg("--cookies")
            .arg(&self.cookies_file)
            .arg("--format")
            .arg(&self.format)
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("wav")
            // whisper-cpp requires 16kHz audio
            .arg("--postprocessor-args")
            .arg(format!("ffmpeg:-ar {}", self.sample_rate))
            .arg("--output")
            .arg(template)
            .arg("--ignore-errors")
            .arg("--no-warnings")
            .arg("--quiet")
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        for item in items {
            cmd.arg(&item.source_url);
        }

        let result = cmd.output().await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LecternError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(LecternError::Download(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LecternError::Download(format!("yt-dlp failed: {stderr}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn settings_with_cookies(dir: &Path) -> Settings {
        let cookies = dir.join("cookies.txt");
        std::fs::write(&cookies, "# Netscape HTTP Cookie File\n").unwrap();
        let mut settings = Settings::default();
        settings.download.cookies_file = cookies.to_str().unwrap().to_string();
        settings
    }

    #[test]
    fn test_missing_cookies_file_is_rejected() {
        let mut settings = Settings::default();
        settings.download.cookies_file = "/definitely/not/there/cookies.txt".to_string();
        assert!(matches!(
            YtDlpDownloader::from_settings(&settings),
            Err(LecternError::MissingCredential(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_work_dir_is_rejected() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let downloader = YtDlpDownloader::from_settings(&settings_with_cookies(dir.path())).unwrap();

        // An output template yt-dlp cannot receive must fail loudly; a
        // defaulted template would scatter files the ledger never sees.
        let bad_dir = PathBuf::from(std::ffi::OsStr::from_bytes(b"/tmp/\xff"));
        let items = vec![WorkItem {
            source_url: "https://host/v?id=lec1".to_string(),
            identifier: "lec1".to_string(),
        }];

        let err = downloader.download(&items, &bad_dir).await.unwrap_err();
        assert!(matches!(err, LecternError::Download(_)));
    }
}
