//! Change events delivered to entity caches.

use std::fmt;

/// Primary identifier of an entity within one entity-kind cache.
///
/// Derived from the backing store's document id, e.g. a hex-encoded object id.
pub type PrimaryKey = String;

/// Kind of change carried by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Insert or update of a document.
    Update,
    /// Removal of a document.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

/// A notification describing an entity's insertion/update or removal.
///
/// Delete notifications frequently carry no usable payload, so the value is
/// optional; caches compute delete index keys from the value they hold.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent<E> {
    key: PrimaryKey,
    value: Option<E>,
    kind: ChangeKind,
}

impl<E> ChangeEvent<E> {
    /// Create an update event carrying the new value.
    pub fn update(key: impl Into<PrimaryKey>, value: E) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
            kind: ChangeKind::Update,
        }
    }

    /// Create a delete event without payload.
    pub fn delete(key: impl Into<PrimaryKey>) -> Self {
        Self {
            key: key.into(),
            value: None,
            kind: ChangeKind::Delete,
        }
    }

    /// Create an event from its parts.
    pub fn new(key: impl Into<PrimaryKey>, value: Option<E>, kind: ChangeKind) -> Self {
        Self {
            key: key.into(),
            value,
            kind,
        }
    }

    /// Primary key the event refers to.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value carried by the event, if any.
    #[inline]
    pub fn value(&self) -> Option<&E> {
        self.value.as_ref()
    }

    /// Kind of change.
    #[inline]
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Split the event into key and value.
    pub fn into_parts(self) -> (PrimaryKey, Option<E>) {
        (self.key, self.value)
    }
}
