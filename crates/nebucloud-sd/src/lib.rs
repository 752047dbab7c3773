//! # nebucloud-sd
//!
//! In-memory mirror of a service-discovery registry held in an external
//! store, kept current by change notifications so lookups by id or by
//! derived attributes are answered without a database round trip.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebucloud_sd::prelude::*;
//! use serde_json::json;
//!
//! // Register the built-in caches
//! let registry = CacheRegistry::with_defaults()?;
//!
//! // Feed a change event from the store
//! let doc = json!({
//!     "_id": { "$oid": "5f1d7c1e9a0b8c7d6e5f4a3b" },
//!     "domain": "default",
//!     "project": "default",
//!     "service": { "service_id": "svc-1", "app_id": "shop", "service_name": "orders", "version": "1.0.0" }
//! });
//! registry.dispatch("service", ChangeKind::Update, &doc)?;
//!
//! // Look it up by a secondary index
//! let services = registry.typed::<Service>("service")?;
//! assert_eq!(services.get_value("default/default/shop/orders").len(), 1);
//! # Ok::<(), SdError>(())
//! ```
//!
//! ## Architecture
//!
//! - `sd-core` - Entity trait, change events, index keys, errors
//! - `sd-types` - Registry record types
//! - `sd-cache` - Entity caches, indexes, watches and the cache registry
//!
//! This crate (`nebucloud-sd`) re-exports all public APIs for convenience.
//!
//! ## Design Principles
//!
//! 1. **No global lock** - Primary map and index are sharded `DashMap`s
//! 2. **Never fails on events** - Invalid or partial events are no-ops
//! 3. **Typed caches** - One entity type per cache, no runtime casts
//! 4. **Rebuildable** - Nothing is persisted; resync is clear plus replay

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use sd_cache as cache;
pub use sd_core as core;
pub use sd_types as types;

/// Prelude module for convenient imports.
///
/// ```rust
/// use nebucloud_sd::prelude::*;
/// ```
pub mod prelude {
    pub use sd_core::{
        ChangeEvent, ChangeKind, Entity, IndexKey, PrimaryKey, RawDocument, SdError, SdResult,
    };

    pub use sd_cache::{
        ApplyOutcome, CacheAction, CacheEvent, CacheOptions, CacheRegistry, CacheStats, Cacher,
        DeleteOutcome, EntityCache, EntityCacher, IndexCache, IndexFuncs, IndexUpdatePolicy,
        UpdateOutcome, Watch, WatchId,
    };

    pub use sd_types::{Instance, MicroService, MicroServiceInstance, Service};
}

/// Version information for this crate.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Minimum supported Rust version.
    pub const MSRV: &str = env!("CARGO_PKG_RUST_VERSION");

    /// Get version info as a string.
    pub fn version_string() -> String {
        format!("nebucloud-sd {} (MSRV {})", VERSION, MSRV)
    }
}
