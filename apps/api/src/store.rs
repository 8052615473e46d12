//! Append-only JSON-file history of analysis runs.
//!
//! Newest records sit first and the file is capped, so it stays a small,
//! human-readable log. The store self-heals: a missing or corrupted backing
//! file is reinitialized to an empty list instead of failing requests.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::analysis::AnalysisRecord;

/// Maximum records kept on disk; older entries fall off the end.
pub const STORE_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct AnalysisStore {
    path: PathBuf,
    // One writer at a time; readers share the lock so they never observe
    // a half-written file.
    lock: Mutex<()>,
}

impl AnalysisStore {
    /// Opens the store, creating the parent directory and backing file as
    /// needed and resetting unparseable content to an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        store.ensure_backing_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Prepends a record and rewrites the capped file.
    pub fn append(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.read_records();
        records.insert(0, record);
        records.truncate(STORE_LIMIT);

        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AnalysisRecord> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.read_records();
        records.truncate(limit.min(STORE_LIMIT));
        records
    }

    /// Single record lookup by id.
    pub fn find(&self, id: Uuid) -> Option<AnalysisRecord> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_records().into_iter().find(|r| r.id == id)
    }

    fn ensure_backing_file(&self) -> Result<(), StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                if serde_json::from_str::<Vec<AnalysisRecord>>(&content).is_err() {
                    warn!(
                        "Analysis store at {} is unreadable, reinitializing to empty",
                        self.path.display()
                    );
                    fs::write(&self.path, "[]")?;
                }
            }
            Err(_) => {
                fs::write(&self.path, "[]")?;
            }
        }
        Ok(())
    }

    /// Full record list; unreadable content degrades to empty rather than
    /// failing the caller.
    fn read_records(&self) -> Vec<AnalysisRecord> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                debug!("Analysis store parse failed ({e}), treating as empty");
                Vec::new()
            }),
            Err(e) => {
                debug!("Analysis store read failed ({e}), treating as empty");
                Vec::new()
            }
        }
    }
}
