//! Registry of entity caches by kind name.
//!
//! The registry is populated by an explicit call sequence at process start,
//! before any event is dispatched, and is read-only afterwards. Registration
//! order is preserved and is the order in which caches are listed.

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use sd_core::{ChangeKind, Entity, RawDocument, SdError, SdResult};
use tracing::{debug, info};

use crate::cache::{ApplyOutcome, EntityCache};
use crate::cacher::{Cacher, EntityCacher};
use crate::instance::new_instance_cacher;
use crate::service::new_service_cacher;

/// Registry mapping entity-kind names to their caches.
///
/// # Example
///
/// ```rust
/// use sd_cache::CacheRegistry;
/// use sd_core::ChangeKind;
/// use sd_types::Service;
/// use serde_json::json;
///
/// let registry = CacheRegistry::with_defaults().unwrap();
///
/// let doc = json!({
///     "_id": { "$oid": "5f1d7c1e9a0b8c7d6e5f4a3b" },
///     "domain": "default",
///     "project": "default",
///     "service": { "service_id": "svc-1", "app_id": "shop", "service_name": "orders", "version": "1.0.0" }
/// });
/// registry.dispatch("service", ChangeKind::Update, &doc).unwrap();
///
/// let services = registry.typed::<Service>("service").unwrap();
/// assert_eq!(services.get_value("default/default/svc-1").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CacheRegistry {
    caches: Vec<Arc<dyn Cacher>>,
    by_name: HashMap<String, usize>,
}

impl CacheRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `service` and `instance` caches.
    pub fn with_defaults() -> SdResult<Self> {
        let mut registry = Self::new();
        registry.register(new_service_cacher)?;
        registry.register(new_instance_cacher)?;
        Ok(registry)
    }

    /// Build a cacher with `factory` and register it under its name.
    ///
    /// The factory is called exactly once. Returns the registered cacher.
    pub fn register<C, F>(&mut self, factory: F) -> SdResult<Arc<C>>
    where
        C: Cacher + 'static,
        F: FnOnce() -> C,
    {
        let cacher = Arc::new(factory());
        let name = cacher.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(SdError::DuplicateKind { kind: name });
        }

        self.by_name.insert(name.clone(), self.caches.len());
        self.caches.push(Arc::clone(&cacher) as Arc<dyn Cacher>);
        info!(cache = %name, "registered cache");
        Ok(cacher)
    }

    /// Get the cacher registered under `kind`.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Arc<dyn Cacher>> {
        self.by_name.get(kind).map(|&i| &self.caches[i])
    }

    /// Check if a kind is registered.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.by_name.contains_key(kind)
    }

    /// Get the typed cache registered under `kind`.
    pub fn typed<E: Entity>(&self, kind: &str) -> SdResult<Arc<EntityCache<E>>> {
        let cacher = self.get(kind).ok_or_else(|| SdError::UnknownKind {
            kind: kind.to_string(),
        })?;
        cacher
            .as_any()
            .downcast_ref::<EntityCacher<E>>()
            .map(|c| Arc::clone(c.cache()))
            .ok_or_else(|| SdError::KindMismatch {
                expected: type_name::<E>().to_string(),
                actual: kind.to_string(),
            })
    }

    /// Route a raw document to the cache of `kind` and apply it.
    pub fn dispatch(
        &self,
        kind: &str,
        change: ChangeKind,
        doc: &RawDocument,
    ) -> SdResult<ApplyOutcome> {
        let cacher = self.get(kind).ok_or_else(|| SdError::UnknownKind {
            kind: kind.to_string(),
        })?;
        cacher.apply_document(change, doc)
    }

    /// Mark every cache dirty.
    pub fn mark_all_dirty(&self) {
        for cacher in &self.caches {
            cacher.mark_dirty();
        }
        debug!(caches = self.caches.len(), "marked all caches dirty");
    }

    /// Names of the caches currently due for a resync.
    #[must_use]
    pub fn dirty_kinds(&self) -> Vec<String> {
        self.caches
            .iter()
            .filter(|c| c.dirty())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Clear every dirty cache, returning the names of the cleared caches.
    pub fn clear_dirty(&self) -> Vec<String> {
        let mut cleared = Vec::new();
        for cacher in self.caches.iter().filter(|c| c.dirty()) {
            cacher.clear();
            cleared.push(cacher.name().to_string());
        }
        if !cleared.is_empty() {
            debug!(caches = ?cleared, "cleared dirty caches");
        }
        cleared
    }

    /// Names of all registered caches, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.caches.iter().map(|c| c.name()).collect()
    }

    /// Iterate over all registered caches, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Cacher>> {
        self.caches.iter()
    }

    /// Get the number of registered caches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
