//! Deal record cache on the local filesystem
//!
//! One pretty-printed JSON file per thread, named deterministically from the
//! thread URL. Writes go through a temp file and rename so a crash mid-write
//! never corrupts the previous valid entry. Concurrent scrapes of the same
//! thread are serialized with a per-filename async lock; different threads
//! never contend.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::models::{DealRecord, StoredFile};
use crate::utils::error::StoreError;

/// Outcome of a batch delete: per-item successes and failures
#[derive(Debug, Default, serde::Serialize)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub errors: Vec<String>,
}

/// Filesystem-backed store for scraped deal records
pub struct DealStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DealStore {
    /// Create a store rooted at `dir`; the directory is created lazily on
    /// first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Acquire the per-thread lock for a cache filename
    ///
    /// Held for the duration of a scrape so two requests for the same thread
    /// cannot race on the cache file (lost-update protection).
    pub async fn lock_thread(&self, filename: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(filename.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        mutex.lock_owned().await
    }

    /// Load a cached record, treating every failure as a miss
    ///
    /// A missing, unreadable or unparsable cache file must never fail a
    /// scrape; it just means the thread gets fetched fresh.
    pub fn load(&self, filename: &str) -> Option<DealRecord> {
        let path = self.dir.join(filename);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(%filename, error = %e, "failed to read cache entry, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%filename, error = %e, "unparsable cache entry, treating as miss");
                None
            }
        }
    }

    /// Write a record through to its cache file (full overwrite)
    pub fn save(&self, filename: &str, record: &DealRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;
        self.write_atomic(filename, &json)
    }

    /// Load the raw JSON value of a cache entry
    ///
    /// Used by read-modify-write callers (the chat feature attaching a
    /// summary) that must not drop fields this engine does not own.
    pub fn load_value(&self, filename: &str) -> Result<Value, StoreError> {
        let path = self.dir.join(filename);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(filename.to_string()))
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Overwrite a cache entry with a raw JSON value, preserving whatever
    /// fields the caller kept in it
    pub fn save_value(&self, filename: &str, value: &Value) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_atomic(filename, &json)
    }

    /// List all cache entries, newest first
    ///
    /// Titles come from the stored `deal_title`, falling back to the
    /// filename for entries that cannot be read.
    pub fn list(&self) -> Result<Vec<StoredFile>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(".json") {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(%filename, error = %e, "skipping entry without metadata");
                    continue;
                }
            };

            let modified = metadata
                .modified()
                .map(|time| {
                    DateTime::<Local>::from(time)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                })
                .unwrap_or_default();

            let title = self
                .load(&filename)
                .map(|record| record.deal_title)
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| filename.clone());

            files.push(StoredFile {
                filename,
                title,
                modified,
                size: metadata.len(),
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Delete the named cache entries, collecting per-item errors
    ///
    /// Filenames carrying path separators or parent references are rejected
    /// per-item; a bad name never aborts the rest of the batch.
    pub fn delete(&self, filenames: &[String]) -> DeleteOutcome {
        let mut outcome = DeleteOutcome::default();

        for filename in filenames {
            if let Err(e) = validate_filename(filename) {
                outcome.errors.push(e.to_string());
                continue;
            }

            let path = self.dir.join(filename);
            if !path.exists() {
                outcome.errors.push(format!("File not found: {filename}"));
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => outcome.deleted.push(filename.clone()),
                Err(e) => outcome
                    .errors
                    .push(format!("Error deleting {filename}: {e}")),
            }
        }

        outcome
    }

    /// Delete every `.json` entry in the store, returning how many went away
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut count = 0;
        for entry in entries.flatten() {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(".json") {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => count += 1,
                Err(e) => warn!(%filename, error = %e, "failed to delete cache entry"),
            }
        }

        Ok(count)
    }

    /// Replace-on-success write: temp file in the same directory, then rename
    fn write_atomic(&self, filename: &str, json: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.dir.join(filename);
        let tmp = self.dir.join(format!("{filename}.tmp"));

        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;

        debug!(%filename, bytes = json.len(), "wrote cache entry");
        Ok(())
    }
}

/// Reject filenames that could escape the data directory
fn validate_filename(filename: &str) -> Result<(), StoreError> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(StoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
