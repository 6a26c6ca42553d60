//! Result Store
//!
//! Bounded in-memory store of finished checks, keyed by lowercased tool
//! name. Entries expire after a TTL; when full, the oldest entry is evicted.
//! Writes for the same key replace each other (last write wins).

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::StoreConfig;
use crate::types::ComplianceResult;

struct StoredResult {
    result: Arc<ComplianceResult>,
    stored_at: Instant,
}

pub struct ResultStore {
    entries: DashMap<String, StoredResult>,
    max_entries: usize,
    ttl: Duration,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl ResultStore {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.max_entries, Duration::from_secs(config.ttl_secs))
    }

    fn key(tool_name: &str) -> String {
        tool_name.trim().to_lowercase()
    }

    /// Store `result` under `tool_name`, replacing any previous entry
    pub fn insert(&self, tool_name: &str, result: ComplianceResult) {
        let key = Self::key(tool_name);

        self.purge_expired();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.entries.insert(
            key,
            StoredResult {
                result: Arc::new(result),
                stored_at: Instant::now(),
            },
        );
    }

    /// Latest unexpired result for `tool_name`, case-insensitive
    pub fn get(&self, tool_name: &str) -> Option<Arc<ComplianceResult>> {
        let key = Self::key(tool_name);
        {
            // guard must be dropped before `remove` on the same shard
            let entry = self.entries.get(&key)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(Arc::clone(&entry.result));
            }
        }

        self.remove_if_expired(&key);
        None
    }

    /// A fresh insert racing between the expiry check and here must survive
    fn remove_if_expired(&self, key: &str) {
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() >= ttl)
            .is_some()
        {
            debug!(tool = %key, "Stored result expired");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.stored_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            debug!(tool = %key, "Evicting oldest stored result");
            self.entries.remove(&key);
        }
    }
}
