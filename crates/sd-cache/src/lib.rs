//! # sd-cache
//!
//! In-memory, secondary-indexed mirrors of registry records, kept current by
//! a stream of change events instead of store queries on every read.
//!
//! - [`EntityCache`] - per-kind cache: primary map, secondary index, dirty flag
//! - [`IndexCache`] - index key to set of primary keys
//! - [`IndexFuncs`] - ordered index functions of one entity kind
//! - [`is_value_unchanged`] - structural change detection for updates
//! - [`CacheRegistry`] - kind name to cache, with raw-document dispatch
//! - [`Watch`] - subscription to applied changes
//!
//! ## Key Design Decisions
//!
//! - Uses `DashMap` for the primary map and the index; no global lock
//! - Primary map and index are eventually consistent with each other
//! - Event application never fails: absent or invalid values are no-ops
//! - Watch notifications are non-blocking and skip unchanged updates
//!
//! ## Example
//!
//! ```rust
//! use sd_cache::service::{new_service_cache, service_id_key};
//! use sd_cache::CacheOptions;
//! use sd_core::ChangeEvent;
//! use sd_types::{MicroService, Service};
//!
//! let cache = new_service_cache(CacheOptions::default());
//! let svc = Service::new("default", "default", MicroService::new("svc-1", "shop", "orders", "1.0.0"));
//!
//! cache.process_update(ChangeEvent::update("5f1d7c1e", svc.clone()));
//!
//! let found = cache.get_value(service_id_key("default", "default", "svc-1").as_str());
//! assert_eq!(*found[0], svc);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod cacher;
mod config;
mod diff;
mod index;
mod index_funcs;
mod metrics;
mod registry;
mod stats;
mod watch;

pub mod instance;
pub mod service;

pub use cache::{ApplyOutcome, DeleteOutcome, EntityCache, UpdateOutcome};
pub use cacher::{json_decoder, Cacher, Decoder, EntityCacher};
pub use config::{CacheOptions, IndexUpdatePolicy};
pub use diff::{is_value_unchanged, stale_index_keys};
pub use index::IndexCache;
pub use index_funcs::{IndexFn, IndexFuncs};
pub use self::metrics::CacheMetrics;
pub use registry::CacheRegistry;
pub use stats::CacheStats;
pub use watch::{CacheAction, CacheEvent, Watch, WatchId, WatchManager};
