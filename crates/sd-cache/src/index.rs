//! Secondary index storage.
//!
//! [`IndexCache`] maps an index key to the set of primary keys whose entities
//! currently produce that key. It knows nothing about entity content.

use std::collections::HashSet;

use dashmap::DashMap;
use fnv::FnvBuildHasher;
use sd_core::{IndexKey, PrimaryKey};
use tracing::trace;

/// Concurrent map from index key to a set of primary keys.
///
/// Backed by a sharded `DashMap`, so `put`, `delete` and `get` may be called
/// from many threads without caller-side locking. Sets that become empty are
/// pruned; `get` on a pruned or unknown key returns an empty vec either way.
#[derive(Debug, Default)]
pub struct IndexCache {
    sets: DashMap<IndexKey, HashSet<PrimaryKey, FnvBuildHasher>, FnvBuildHasher>,
}

impl IndexCache {
    /// Create an empty index cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to the set for `key`, creating the set if absent.
    ///
    /// Adding an id that is already present has no effect.
    pub fn put(&self, key: &IndexKey, id: &str) {
        trace!(index = %key, id, "index put");
        // Clone the key only when the set does not exist yet.
        if let Some(mut set) = self.sets.get_mut(key.as_str()) {
            set.insert(id.to_string());
            return;
        }
        self.sets
            .entry(key.clone())
            .or_default()
            .insert(id.to_string());
    }

    /// Snapshot of the primary keys currently stored under `key`.
    pub fn get(&self, key: &str) -> Vec<PrimaryKey> {
        self.sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `id` is stored under `key`.
    pub fn contains(&self, key: &str, id: &str) -> bool {
        self.sets.get(key).is_some_and(|set| set.contains(id))
    }

    /// Remove `id` from the set for `key`, pruning the set once it is empty.
    pub fn delete(&self, key: &str, id: &str) {
        {
            let Some(mut set) = self.sets.get_mut(key) else {
                return;
            };
            set.remove(id);
        }
        // The shard guard above must be released before `remove_if` locks it again.
        // A concurrent `put` between the two steps leaves the set non-empty.
        self.sets.remove_if(key, |_, set| set.is_empty());
        trace!(index = key, id, "index delete");
    }

    /// Remove every key and set.
    pub fn clear(&self) {
        self.sets.clear();
    }

    /// Number of index keys with at least one primary key.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no index key is stored.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// All index keys currently stored.
    pub fn keys(&self) -> Vec<IndexKey> {
        self.sets.iter().map(|r| r.key().clone()).collect()
    }
}
