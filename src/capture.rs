//!
//! Request capture for debugging client integrations.
//!
//! When enabled, every incoming request body and its translation are written
//! side by side into the capture directory as
//! `<timestamp>-<seq>.request.json` and `<timestamp>-<seq>.translated.json`.
//! Failures are reported to the caller, which logs and ignores them.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;

/* --- constants ------------------------------------------------------------------------------ */

/** Timestamp prefix; sorts lexically in capture order */
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Files written for one captured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFiles {
    /** raw incoming body */
    pub request: PathBuf,
    /** translated body, absent when translation failed */
    pub translated: Option<PathBuf>,
}

///
/// Writes request/translation pairs to a directory.
#[derive(Debug)]
pub struct RequestCapture {
    /** target directory, created on first write */
    dir: PathBuf,
    /** per-process sequence number, disambiguates equal timestamps */
    seq: AtomicU64,
}

/* --- start of code -------------------------------------------------------------------------- */

impl RequestCapture {
    ///
    /// Create a capture writer.
    ///
    /// # Arguments
    ///  * `dir` - capture directory; created on first use
    ///
    /// # Returns
    ///  * New capture instance
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), seq: AtomicU64::new(0) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    ///
    /// Write one request and, if present, its translation.
    ///
    /// # Arguments
    ///  * `request` - raw incoming body
    ///  * `translated` - translated body, `None` when translation failed
    ///
    /// # Returns
    ///  * Paths of the written files
    ///  * `BridgeError::Io` if the directory or a file cannot be written
    pub async fn record(&self, request: &[u8], translated: Option<&[u8]>) -> Result<CapturedFiles> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let stem = format!("{}-{:06}", chrono::Utc::now().format(TIMESTAMP_FORMAT), seq);

        let request_path = self.dir.join(format!("{}.request.json", stem));
        tokio::fs::write(&request_path, request).await?;

        let translated_path = match translated {
            Some(body) => {
                let path = self.dir.join(format!("{}.translated.json", stem));
                tokio::fs::write(&path, body).await?;
                Some(path)
            }
            None => None,
        };

        tracing::debug!("Captured request {} into {}", stem, self.dir.display());
        Ok(CapturedFiles { request: request_path, translated: translated_path })
    }
}

/* --- tests ----------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_writes_pair() {
        let temp_dir = TempDir::new().unwrap();
        let capture = RequestCapture::new(temp_dir.path().join("nested"));

        let files = capture.record(b"{\"in\":1}", Some(&b"{\"out\":1}"[..])).await.unwrap();

        assert_eq!(std::fs::read(&files.request).unwrap(), b"{\"in\":1}");
        let translated = files.translated.expect("translated file written");
        assert_eq!(std::fs::read(&translated).unwrap(), b"{\"out\":1}");
        assert!(translated.to_string_lossy().ends_with("-000000.translated.json"));
    }

    #[tokio::test]
    async fn test_failed_translation_writes_request_only() {
        let temp_dir = TempDir::new().unwrap();
        let capture = RequestCapture::new(temp_dir.path());

        let first = capture.record(b"bad", None).await.unwrap();
        let second = capture.record(b"bad", None).await.unwrap();

        assert!(first.translated.is_none());
        assert_ne!(first.request, second.request);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }
}
