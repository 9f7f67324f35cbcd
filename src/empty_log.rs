//! Append-only log of threads that fetched but produced no topics.
//!
//! Several crawl workers may share one log file. Within a process every
//! append, from any [`EmptyThreadLog`] instance, happens under one lock held
//! only for the duration of the write. Each line goes out as a single
//! append-mode write, so lines from separate processes land whole.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::Result;

/// Serializes appends across every log instance in the process.
static APPEND_LOCK: Mutex<()> = Mutex::new(());

/// Lock-guarded "empty threads" log.
#[derive(Debug, Clone)]
pub struct EmptyThreadLog {
    path: PathBuf,
}

impl EmptyThreadLog {
    /// Log writing to `path`; the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `thread_id` on its own line.
    pub fn record(&self, thread_id: &str) -> Result<()> {
        let line = format!("{thread_id}\n");
        let _guard = APPEND_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!(thread_id, path = %self.path.display(), "recorded empty thread");
        Ok(())
    }
}
