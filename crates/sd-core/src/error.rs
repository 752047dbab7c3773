//! Error types for the mirror cache.
//!
//! This module provides [`SdError`]. Cache reads and event application never
//! fail; errors only surface where documents enter the system (decoding,
//! routing to a cache kind, registration) and on watch channels.

/// Error type for the registration and dispatch boundary.
///
/// # Example
///
/// ```rust
/// use sd_core::SdError;
///
/// let err = SdError::UnknownKind { kind: "rule".to_string() };
/// assert!(err.to_string().contains("rule"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SdError {
    /// A raw document could not be decoded into the cache's entity type.
    #[error("failed to decode {kind} document: {reason}")]
    DecodeFailed {
        /// Entity kind the document was routed to.
        kind: String,
        /// Reason reported by the decoder.
        reason: String,
    },

    /// A raw document carries no usable document identifier.
    #[error("{kind} document has no usable document id")]
    MissingDocumentId {
        /// Entity kind the document was routed to.
        kind: String,
    },

    /// No cache is registered for the requested entity kind.
    #[error("no cache registered for kind {kind}")]
    UnknownKind {
        /// The requested entity kind.
        kind: String,
    },

    /// A cache with the same entity kind was already registered.
    #[error("a cache for kind {kind} is already registered")]
    DuplicateKind {
        /// The entity kind registered twice.
        kind: String,
    },

    /// A typed lookup asked for a different entity type than the one registered.
    #[error("cache {actual} does not hold entities of type {expected}")]
    KindMismatch {
        /// Entity type requested by the caller.
        expected: String,
        /// Entity kind actually registered.
        actual: String,
    },

    /// Watch subscription was closed.
    #[error("watch closed: watch_id={watch_id}")]
    WatchClosed {
        /// ID of the closed watch.
        watch_id: u64,
    },
}

impl SdError {
    /// Create a decode error for a document routed to `kind`.
    pub fn decode(kind: impl Into<String>, reason: impl ToString) -> Self {
        Self::DecodeFailed {
            kind: kind.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error means the event was dropped because its document was unusable.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::DecodeFailed { .. } | Self::MissingDocumentId { .. })
    }
}
