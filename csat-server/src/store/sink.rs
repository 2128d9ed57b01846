//! Append-only CSV sink
//!
//! The CSV file is the durability backstop for submissions. Concurrent
//! requests appending to the same file must not interleave partial lines,
//! so every write path takes the sink's mutex for the whole
//! check-header-then-append sequence.

use csat_common::csv::{self, CSV_HEADER};
use csat_common::model::SurveyResponse;
use csat_common::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

/// Serialized writer for the on-disk CSV snapshot
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with a header row if it does not exist yet
    pub async fn ensure_exists(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.ensure_exists_locked()
    }

    /// Append one response as a single CSV line
    pub async fn append(&self, response: &SurveyResponse) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.ensure_exists_locked()?;

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", csv::encode_row(response))?;
        Ok(())
    }

    /// Rewrite the file down to the header row (after bulk deletion)
    ///
    /// Writes a temp file and renames it into place so a crash mid-write
    /// never leaves a truncated snapshot.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        let tmp = self.path.with_extension("csv.tmp");
        std::fs::write(&tmp, format!("{}\n", CSV_HEADER))?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Raw file contents, for the export fallback path
    pub async fn read_raw(&self) -> Result<String> {
        let _guard = self.lock.lock().await;
        if !self.path.exists() {
            return Err(Error::NotFound(format!(
                "CSV file not found: {}",
                self.path.display()
            )));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn ensure_exists_locked(&self) -> Result<()> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, format!("{}\n", CSV_HEADER))?;
            info!("Created CSV file: {}", self.path.display());
        }
        Ok(())
    }
}
