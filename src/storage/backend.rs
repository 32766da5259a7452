//! Persistence backends for the delivered-id record

use super::DedupRecord;
use crate::error::{RelayError, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Where the delivered-id record lives
pub trait DedupBackend: Send + Sync {
    /// Read the record; a missing record is an empty one
    fn load(&self) -> Result<DedupRecord>;

    /// Replace the stored record
    fn save(&self, record: &DedupRecord) -> Result<()>;
}

/// JSON document on local disk
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DedupBackend for JsonFileBackend {
    fn load(&self) -> Result<DedupRecord> {
        if !self.path.exists() {
            return Ok(DedupRecord::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, record: &DedupRecord) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(record)?;

        // Write-then-rename so a crash never leaves half a document
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process backend for tests and dry runs
#[derive(Default)]
pub struct MemoryBackend {
    record: Mutex<Option<DedupRecord>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: DedupRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            ..Self::default()
        }
    }

    /// Backend whose reads and/or writes always fail
    pub fn failing(fail_reads: bool, fail_writes: bool) -> Self {
        Self {
            record: Mutex::new(None),
            fail_reads,
            fail_writes,
        }
    }

    /// Last record written, if any
    pub fn snapshot(&self) -> Option<DedupRecord> {
        self.record.lock().clone()
    }
}

impl DedupBackend for MemoryBackend {
    fn load(&self) -> Result<DedupRecord> {
        if self.fail_reads {
            return Err(RelayError::Storage("simulated read failure".into()));
        }
        Ok(self.record.lock().clone().unwrap_or_default())
    }

    fn save(&self, record: &DedupRecord) -> Result<()> {
        if self.fail_writes {
            return Err(RelayError::Storage("simulated write failure".into()));
        }
        *self.record.lock() = Some(record.clone());
        Ok(())
    }
}
