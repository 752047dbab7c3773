//! # sd-core
//!
//! Core types, traits, and error handling for the service-discovery mirror cache.
//!
//! This crate provides the foundational types used across all other sd crates:
//!
//! - [`SdError`] - Error type for the registration and dispatch boundary
//! - [`Entity`] - Trait implemented by every record kind held in a cache
//! - [`ChangeEvent`] - Insert/update or delete notification for one record
//! - [`IndexKey`] - Secondary index key built from `'/'`-joined attributes
//! - [`RawDocument`] - Undecoded document as delivered by the change feed
//!
//! ## Example
//!
//! ```rust
//! use sd_core::{ChangeEvent, ChangeKind, IndexKey};
//!
//! let key = IndexKey::from_parts(["default", "default", "svc-1"]);
//! assert_eq!(key.as_str(), "default/default/svc-1");
//!
//! let event: ChangeEvent<String> = ChangeEvent::delete("5f1d7c1e9a0b");
//! assert_eq!(event.kind(), ChangeKind::Delete);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod entity;
mod error;
mod event;
mod index_key;

pub use document::{document_id, RawDocument, DOCUMENT_ID_FIELD};
pub use entity::Entity;
pub use error::SdError;
pub use event::{ChangeEvent, ChangeKind, PrimaryKey};
pub use index_key::{IndexKey, INDEX_KEY_SEPARATOR};

/// Result type alias using [`SdError`].
pub type Result<T> = std::result::Result<T, SdError>;

/// Alias for Result used across the sd crates.
pub type SdResult<T> = Result<T>;
