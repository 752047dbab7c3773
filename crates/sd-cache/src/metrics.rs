//! Metrics emitted by entity caches.
//!
//! Emission goes through the `metrics` facade, so nothing is recorded unless
//! the host process installs a recorder (e.g. a Prometheus exporter).
//!
//! - `sd_cache_events_total{cache, op}` - applied events by outcome
//! - `sd_cache_entries{cache}` - primary map size after each mutation
//! - `sd_cache_resyncs_total{cache}` - full resets

use metrics::{counter, gauge};

/// Metric handle for one entity cache.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    cache: String,
}

impl CacheMetrics {
    /// Create a metrics handle labelled with the cache name.
    pub fn new(cache: impl Into<String>) -> Self {
        Self {
            cache: cache.into(),
        }
    }

    /// Record an applied event with its outcome label.
    pub fn record_event(&self, op: &'static str) {
        counter!("sd_cache_events_total", "cache" => self.cache.clone(), "op" => op).increment(1);
    }

    /// Record the current number of entries.
    pub fn record_entries(&self, entries: usize) {
        gauge!("sd_cache_entries", "cache" => self.cache.clone()).set(entries as f64);
    }

    /// Record a full reset.
    pub fn record_resync(&self) {
        counter!("sd_cache_resyncs_total", "cache" => self.cache.clone()).increment(1);
        self.record_entries(0);
    }
}
