//! Durable finished-tip memory.
//!
//! One JSON record under [`FINISHED_TIPS_KEY`] maps tip names to
//! `{"finished": true}`. Reads go through a process-local cache that is
//! dropped on every write and reloaded on the next lookup.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::KeyValueStore;
use crate::error::Result;
use crate::tip::TipId;

/// Storage key of the finished-tips record.
pub const FINISHED_TIPS_KEY: &str = "__beacon_finished_tips";

const EMPTY_RECORD: &str = "{}";

/// Per-tip durable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    #[serde(default)]
    pub finished: bool,
}

/// The whole persisted record. Absent key means not finished.
pub type FinishedRecord = BTreeMap<String, TipRecord>;

/// Persistence adapter for finished tips.
///
/// Never fails visibly: a missing or corrupt record reads as empty, and
/// store errors are logged and swallowed. A record that could not be read
/// is never overwritten, except by [`FinishedTips::reset`].
#[derive(Debug)]
pub struct FinishedTips<S> {
    store: S,
    cache: Option<FinishedRecord>,
}

impl<S: KeyValueStore> FinishedTips<S> {
    pub fn new(store: S) -> Self {
        Self { store, cache: None }
    }

    /// Check whether `tip` has been finished.
    pub fn is_finished(&mut self, tip: &TipId) -> bool {
        if self.cache.is_none() {
            // A failed read is not cached, so the next lookup retries.
            self.cache = self.load(true);
        }
        self.cache
            .as_ref()
            .and_then(|record| record.get(tip.as_str()))
            .is_some_and(|r| r.finished)
    }

    /// Mark `tip` finished in the durable record.
    ///
    /// Reads the store fresh rather than trusting the cache, writes the full
    /// record back, then drops the cache.
    pub fn mark_finished(&mut self, tip: &TipId) {
        let Some(mut record) = self.load(false) else {
            warn!(tip = %tip, "Finished tips unreadable, not marking tip");
            return;
        };
        record.insert(tip.to_string(), TipRecord { finished: true });
        self.write(&record);
        self.cache = None;
        debug!(tip = %tip, "tip finished");
    }

    /// Mark several tips finished with a single write.
    pub fn mark_all_finished<'a>(&mut self, tips: impl IntoIterator<Item = &'a TipId>) {
        let Some(mut record) = self.load(false) else {
            warn!("Finished tips unreadable, not marking tips");
            return;
        };
        for tip in tips {
            record.insert(tip.to_string(), TipRecord { finished: true });
        }
        self.write(&record);
        self.cache = None;
    }

    /// Forget every finished tip.
    pub fn reset(&mut self) {
        self.write(&FinishedRecord::new());
        self.cache = None;
    }

    /// Finished tip names, sorted.
    pub fn finished_tips(&mut self) -> Vec<TipId> {
        self.load(true)
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, r)| r.finished)
            .map(|(name, _)| TipId::new(name))
            .collect()
    }

    /// Whether the cache currently holds a loaded record.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current durable record, or `None` when the store could not be read.
    fn load(&mut self, init_if_missing: bool) -> Option<FinishedRecord> {
        let raw = match self.store.get(FINISHED_TIPS_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read finished tips: {}", e);
                return None;
            }
        };

        let record = match raw {
            Some(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Corrupt finished tips record, treating as empty: {}", e);
                FinishedRecord::new()
            }),
            None => {
                if init_if_missing {
                    if let Err(e) = self.store.set(FINISHED_TIPS_KEY, EMPTY_RECORD.to_string()) {
                        warn!("Failed to initialise finished tips record: {}", e);
                    }
                }
                FinishedRecord::new()
            }
        };
        Some(record)
    }

    fn write(&mut self, record: &FinishedRecord) {
        let encoded = match serde_json::to_string(record) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode finished tips: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(FINISHED_TIPS_KEY, encoded) {
            warn!("Failed to write finished tips: {}", e);
        }
    }
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}
