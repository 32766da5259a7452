//! Delivered-signal dedup store
//!
//! Remembers which signal ids were already delivered so a later run does
//! not re-send them. Retention is count-based: once the set grows past
//! `retain` ids, the oldest-inserted ones are dropped.

pub mod backend;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

pub use backend::{DedupBackend, JsonFileBackend, MemoryBackend};

/// Default number of ids kept
pub const DEFAULT_RETAIN: usize = 1000;

/// Persisted form: ids in insertion order plus last-modified time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupRecord {
    #[serde(default)]
    pub processed_ids: Vec<String>,
    #[serde(default, alias = "lastClean", with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
}

/// In-memory view of the delivered-id set over a persistence backend
pub struct DedupStore {
    backend: Box<dyn DedupBackend>,
    order: VecDeque<String>,
    index: HashSet<String>,
    retain: usize,
    last_modified: DateTime<Utc>,
}

impl DedupStore {
    /// Load the record from `backend`.
    ///
    /// A failed read yields an empty set: every signal is treated as new.
    pub fn open(backend: Box<dyn DedupBackend>, retain: usize) -> Self {
        let record = match backend.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Dedup record unreadable, treating all signals as new: {}", e);
                DedupRecord::default()
            }
        };

        let mut store = Self {
            backend,
            order: VecDeque::with_capacity(record.processed_ids.len()),
            index: HashSet::with_capacity(record.processed_ids.len()),
            retain,
            last_modified: record.last_modified,
        };
        for id in record.processed_ids {
            if store.index.insert(id.clone()) {
                store.order.push_back(id);
            }
        }
        store.evict_oldest(retain);

        tracing::debug!("Dedup store opened with {} ids", store.len());
        store
    }

    pub fn seen(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Record a delivered id. Returns false if it was already known.
    pub fn mark_seen(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if !self.index.insert(id.clone()) {
            return false;
        }
        self.order.push_back(id);
        self.last_modified = Utc::now();

        if self.order.len() > self.retain {
            self.evict_oldest(self.retain);
        }
        true
    }

    /// Drop oldest-inserted ids until at most `retain` remain
    pub fn evict_oldest(&mut self, retain: usize) -> usize {
        let mut evicted = 0;
        while self.order.len() > retain {
            if let Some(old) = self.order.pop_front() {
                self.index.remove(&old);
                evicted += 1;
            }
        }
        if evicted > 0 {
            self.last_modified = Utc::now();
            tracing::debug!("Evicted {} ids, {} retained", evicted, self.order.len());
        }
        evicted
    }

    /// Best-effort write-back. Failures are logged and reported as false.
    pub fn persist(&self) -> bool {
        match self.backend.save(&self.record()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist dedup record: {}", e);
                false
            }
        }
    }

    pub fn record(&self) -> DedupRecord {
        DedupRecord {
            processed_ids: self.order.iter().cloned().collect(),
            last_modified: self.last_modified,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }
}
