//! Entity cache configuration.

use serde::{Deserialize, Serialize};

/// How index entries are maintained when a key is updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexUpdatePolicy {
    /// Index entries are only ever added on update.
    ///
    /// Keys derived from a previous value stay in the index until the entry
    /// is deleted or the cache is cleared, so `get_value` on such a key keeps
    /// returning the current value.
    #[default]
    Additive,
    /// Keys derived from the previous value but not from the new one are
    /// retracted on update.
    Retract,
}

/// Configuration for an entity cache.
///
/// # Example
///
/// ```rust
/// use sd_cache::{CacheOptions, IndexUpdatePolicy};
///
/// let options = CacheOptions::default()
///     .with_table("service")
///     .with_index_policy(IndexUpdatePolicy::Retract);
/// assert_eq!(options.table.as_deref(), Some("service"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Entity-kind name the cache serves. Defaults to the entity's kind.
    pub table: Option<String>,
    /// Initial capacity of the primary map.
    pub initial_capacity: usize,
    /// Index maintenance on update.
    pub index_policy: IndexUpdatePolicy,
    /// Channel buffer size of each watch.
    pub watch_buffer_size: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            table: None,
            initial_capacity: 64,
            index_policy: IndexUpdatePolicy::Additive,
            watch_buffer_size: 16,
        }
    }
}

impl CacheOptions {
    /// Set the entity-kind name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the initial capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the index update policy.
    pub fn with_index_policy(mut self, policy: IndexUpdatePolicy) -> Self {
        self.index_policy = policy;
        self
    }

    /// Set the watch channel buffer size.
    pub fn with_watch_buffer_size(mut self, size: usize) -> Self {
        self.watch_buffer_size = size;
        self
    }
}
