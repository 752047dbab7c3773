//! Per-entity-kind mirror cache.
//!
//! An [`EntityCache`] holds the decoded records of one entity kind keyed by
//! primary key, plus one [`IndexCache`] of secondary index keys computed by
//! its [`IndexFuncs`]. Change events are applied incrementally; a dirty flag
//! tells the synchronization engine when a full resync is due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use fnv::FnvBuildHasher;
use sd_core::{ChangeEvent, ChangeKind, Entity, IndexKey, PrimaryKey};
use tracing::{debug, trace};

use crate::config::{CacheOptions, IndexUpdatePolicy};
use crate::diff::{is_value_unchanged, stale_index_keys};
use crate::index::IndexCache;
use crate::index_funcs::IndexFuncs;
use crate::metrics::CacheMetrics;
use crate::stats::CacheStats;
use crate::watch::{CacheAction, CacheEvent, Watch, WatchId, WatchManager};

/// Result of applying an update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The event carried no value or an invalid one; nothing changed.
    Ignored,
    /// The key was not cached before.
    Created,
    /// The key was cached with a different value.
    Updated,
    /// The key was cached with an identical value.
    Unchanged,
}

/// Result of applying a delete event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entry and its index entries were removed.
    Deleted,
    /// The key was not cached.
    Missing,
    /// The cached value is invalid for this kind and was left alone.
    Ignored,
}

/// Outcome of [`EntityCache::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// An update event was applied.
    Update(UpdateOutcome),
    /// A delete event was applied.
    Delete(DeleteOutcome),
}

/// A concurrent, secondary-indexed cache for one entity kind.
///
/// ## Thread Safety
///
/// The primary map and the index are separate `DashMap`s with bucket-level
/// locking; no global lock exists. Applying an event mutates the primary map
/// first and the index afterwards, so a concurrent reader may briefly see a
/// primary entry without its index entries, or an index entry whose primary
/// entry is already gone. [`get_value`](Self::get_value) skips the latter.
///
/// Events for the same key must be applied in feed order by the caller.
///
/// ## Index maintenance
///
/// Under [`IndexUpdatePolicy::Additive`] an update adds the keys derived from
/// the new value and never removes keys derived from the previous one. Those
/// are only dropped by a delete of the entry or by [`clear`](Self::clear).
///
/// # Example
///
/// ```rust
/// use sd_cache::{EntityCache, IndexFuncs};
/// use sd_core::{ChangeEvent, Entity, IndexKey};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Svc { name: String }
///
/// impl Entity for Svc {
///     const KIND: &'static str = "svc";
/// }
///
/// let funcs = IndexFuncs::new().with(|s: &Svc| Some(IndexKey::from(s.name.as_str())));
/// let cache = EntityCache::new(funcs);
///
/// cache.process_update(ChangeEvent::update("id1", Svc { name: "svc-a".into() }));
/// assert_eq!(cache.get_value("svc-a").len(), 1);
///
/// cache.process_delete(ChangeEvent::delete("id1"));
/// assert!(cache.get_value("svc-a").is_empty());
/// assert!(cache.get("id1").is_none());
/// ```
#[derive(Debug)]
pub struct EntityCache<E: Entity> {
    name: String,
    /// Entities keyed by document id.
    entries: DashMap<PrimaryKey, Arc<E>, FnvBuildHasher>,
    /// Index key to the set of document ids producing it.
    indexes: IndexCache,
    index_funcs: IndexFuncs<E>,
    policy: IndexUpdatePolicy,
    dirty: AtomicBool,
    stats: CacheStats,
    metrics: CacheMetrics,
    watches: WatchManager,
}

impl<E: Entity> EntityCache<E> {
    /// Create a cache with default options and the given index functions.
    pub fn new(index_funcs: IndexFuncs<E>) -> Self {
        Self::with_options(CacheOptions::default(), index_funcs)
    }

    /// Create a cache from options and index functions.
    pub fn with_options(options: CacheOptions, index_funcs: IndexFuncs<E>) -> Self {
        let name = options.table.unwrap_or_else(|| E::KIND.to_string());
        debug!(
            cache = %name,
            index_funcs = index_funcs.len(),
            policy = ?options.index_policy,
            "created entity cache"
        );
        Self {
            entries: DashMap::with_capacity_and_hasher(
                options.initial_capacity,
                FnvBuildHasher::default(),
            ),
            indexes: IndexCache::new(),
            index_funcs,
            policy: options.index_policy,
            dirty: AtomicBool::new(false),
            stats: CacheStats::new(),
            metrics: CacheMetrics::new(name.clone()),
            watches: WatchManager::with_buffer_size(options.watch_buffer_size),
            name,
        }
    }

    /// Entity-kind name this cache serves.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of cached entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index update policy in effect.
    #[inline]
    pub fn index_policy(&self) -> IndexUpdatePolicy {
        self.policy
    }

    /// Get cache statistics.
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Secondary index storage of this cache.
    #[inline]
    pub fn index_cache(&self) -> &IndexCache {
        &self.indexes
    }

    /// Index keys the registered functions derive from `value`.
    pub fn index_keys(&self, value: &E) -> Vec<IndexKey> {
        self.index_funcs.get_indexes(value)
    }

    /// Look up an entity by primary key.
    pub fn get(&self, key: &str) -> Option<Arc<E>> {
        // Clone the Arc and drop the shard guard immediately.
        let result = self.entries.get(key).map(|r| Arc::clone(r.value()));
        if result.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        result
    }

    /// Visit a snapshot of all entries until `visit` returns `false`.
    ///
    /// Entries are copied out before visiting, so `visit` may call back into
    /// the cache. Entries written during the call may or may not be seen.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &E) -> bool,
    {
        let snapshot: Vec<(PrimaryKey, Arc<E>)> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();

        for (key, value) in &snapshot {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Resolve a secondary index key to the entities currently producing it.
    ///
    /// Ids whose primary entry is already gone are skipped.
    pub fn get_value(&self, index: &str) -> Vec<Arc<E>> {
        self.indexes
            .get(index)
            .iter()
            .filter_map(|id| self.entries.get(id).map(|r| Arc::clone(r.value())))
            .collect()
    }

    /// Whether the cache is due for a full resync.
    #[inline]
    pub fn dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Request a full resync. Idempotent.
    pub fn mark_dirty(&self) {
        if !self.dirty.swap(true, Ordering::AcqRel) {
            debug!(cache = %self.name, "marked dirty");
        }
    }

    /// Drop all entries and index entries and reset the dirty flag.
    ///
    /// Called when a full resync starts, so nothing from the previous
    /// session survives into the replay.
    pub fn clear(&self) {
        self.dirty.store(false, Ordering::Release);
        self.entries.clear();
        self.indexes.clear();
        self.stats.record_clear();
        self.metrics.record_resync();
        debug!(cache = %self.name, "cleared");
    }

    /// Apply an event according to its kind.
    pub fn apply(&self, event: ChangeEvent<E>) -> ApplyOutcome {
        match event.kind() {
            ChangeKind::Update => ApplyOutcome::Update(self.process_update(event)),
            ChangeKind::Delete => ApplyOutcome::Delete(self.process_delete(event)),
        }
    }

    /// Insert or overwrite an entry and add its index keys.
    ///
    /// Events without a value, or with a value failing [`Entity::is_valid`],
    /// are ignored.
    pub fn process_update(&self, event: ChangeEvent<E>) -> UpdateOutcome {
        let (key, value) = event.into_parts();
        let Some(value) = value.filter(E::is_valid) else {
            trace!(cache = %self.name, key = %key, "ignoring update without valid value");
            self.stats.record_ignored();
            self.metrics.record_event("ignored");
            return UpdateOutcome::Ignored;
        };

        let value = Arc::new(value);
        let previous = self.entries.insert(key.clone(), Arc::clone(&value));

        let keys = self.index_funcs.get_indexes(&value);
        for index in &keys {
            self.indexes.put(index, &key);
        }

        let outcome = match previous {
            None => UpdateOutcome::Created,
            Some(old) if is_value_unchanged(old.as_ref(), value.as_ref()) => {
                UpdateOutcome::Unchanged
            }
            Some(old) => {
                if self.policy == IndexUpdatePolicy::Retract {
                    let old_keys = self.index_funcs.get_indexes(&old);
                    for index in stale_index_keys(&old_keys, &keys) {
                        self.indexes.delete(index.as_str(), &key);
                    }
                }
                UpdateOutcome::Updated
            }
        };

        trace!(cache = %self.name, key = %key, ?outcome, indexes = keys.len(), "applied update");
        self.metrics.record_entries(self.entries.len());
        match outcome {
            UpdateOutcome::Created => {
                self.stats.record_update();
                self.metrics.record_event("created");
                self.notify(key, CacheAction::Created);
            }
            UpdateOutcome::Updated => {
                self.stats.record_update();
                self.metrics.record_event("updated");
                self.notify(key, CacheAction::Updated);
            }
            UpdateOutcome::Unchanged => {
                self.stats.record_unchanged();
                self.metrics.record_event("unchanged");
            }
            UpdateOutcome::Ignored => {}
        }
        outcome
    }

    /// Remove an entry and the index keys derived from its cached value.
    ///
    /// The value carried by the event is not used: delete notifications may
    /// have no payload, and index keys must match what was indexed.
    pub fn process_delete(&self, event: ChangeEvent<E>) -> DeleteOutcome {
        let (key, _) = event.into_parts();

        let Some((key, stored)) = self.entries.remove_if(&key, |_, stored| stored.is_valid()) else {
            let outcome = if self.entries.contains_key(&key) {
                self.stats.record_ignored();
                self.metrics.record_event("ignored");
                DeleteOutcome::Ignored
            } else {
                self.stats.record_delete_miss();
                self.metrics.record_event("missing");
                DeleteOutcome::Missing
            };
            trace!(cache = %self.name, key = %key, ?outcome, "delete not applied");
            return outcome;
        };

        for index in self.index_funcs.get_indexes(&stored) {
            self.indexes.delete(index.as_str(), &key);
        }

        trace!(cache = %self.name, key = %key, "applied delete");
        self.stats.record_delete();
        self.metrics.record_event("deleted");
        self.metrics.record_entries(self.entries.len());
        self.notify(key, CacheAction::Deleted);
        DeleteOutcome::Deleted
    }

    /// Whether `new` is identical to the value cached under `key`.
    ///
    /// Returns `false` when nothing is cached under `key`.
    pub fn is_unchanged(&self, key: &str, new: &E) -> bool {
        self.entries
            .get(key)
            .is_some_and(|r| is_value_unchanged(r.value().as_ref(), new))
    }

    /// Subscribe to created/updated/deleted notifications.
    ///
    /// Updates carrying the cached value do not notify.
    pub fn watch(&self) -> Watch {
        self.watches.create_watch()
    }

    /// Cancel a watch.
    pub fn cancel_watch(&self, watch_id: WatchId) {
        self.watches.cancel_watch(watch_id)
    }

    /// Get the number of active watches.
    pub fn watch_count(&self) -> usize {
        self.watches.watch_count()
    }

    fn notify(&self, key: PrimaryKey, action: CacheAction) {
        self.watches.notify(CacheEvent {
            cache: self.name.clone(),
            key,
            action,
        });
    }
}
