//! Cache statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for one entity cache.
///
/// All counters are atomic and can be safely accessed from multiple threads.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Updates that created or changed an entry.
    updates_applied: AtomicU64,
    /// Updates carrying the value already cached.
    updates_unchanged: AtomicU64,
    /// Events skipped because their value was absent or invalid.
    events_ignored: AtomicU64,
    /// Deletes that removed an entry.
    deletes_applied: AtomicU64,
    /// Deletes for keys not in the cache.
    deletes_missed: AtomicU64,
    /// Primary lookups that found an entry.
    hits: AtomicU64,
    /// Primary lookups that found nothing.
    misses: AtomicU64,
    /// Full resets.
    clears: AtomicU64,
}

impl CacheStats {
    /// Create new cache statistics.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_update(&self) {
        self.updates_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_unchanged(&self) {
        self.updates_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_ignored(&self) {
        self.events_ignored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delete(&self) {
        self.deletes_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delete_miss(&self) {
        self.deletes_missed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total updates that created or changed an entry.
    #[inline]
    pub fn updates_applied(&self) -> u64 {
        self.updates_applied.load(Ordering::Relaxed)
    }

    /// Get total updates that carried the cached value.
    #[inline]
    pub fn updates_unchanged(&self) -> u64 {
        self.updates_unchanged.load(Ordering::Relaxed)
    }

    /// Get total events skipped as absent or invalid.
    #[inline]
    pub fn events_ignored(&self) -> u64 {
        self.events_ignored.load(Ordering::Relaxed)
    }

    /// Get total deletes that removed an entry.
    #[inline]
    pub fn deletes_applied(&self) -> u64 {
        self.deletes_applied.load(Ordering::Relaxed)
    }

    /// Get total deletes for unknown keys.
    #[inline]
    pub fn deletes_missed(&self) -> u64 {
        self.deletes_missed.load(Ordering::Relaxed)
    }

    /// Get total primary lookup hits.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total primary lookup misses.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total full resets.
    #[inline]
    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        for counter in [
            &self.updates_applied,
            &self.updates_unchanged,
            &self.events_ignored,
            &self.deletes_applied,
            &self.deletes_missed,
            &self.hits,
            &self.misses,
            &self.clears,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
