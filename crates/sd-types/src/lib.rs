//! # sd-types
//!
//! Registry record types held in the backing store and mirrored by the cache.
//!
//! Field names follow the stored document shape (snake_case), so the types
//! can be decoded directly from change-feed documents with serde.
//!
//! - [`Service`] wraps a [`MicroService`] definition with its tenancy
//! - [`Instance`] wraps a [`MicroServiceInstance`] with its tenancy

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod instance;
mod service;

pub use instance::{HealthCheck, Instance, MicroServiceInstance, INSTANCE};
pub use service::{MicroService, Service, SERVICE};
