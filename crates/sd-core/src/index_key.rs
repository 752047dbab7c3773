//! Secondary index keys.
//!
//! Index keys are built by joining ordered attribute values with `'/'`.
//! External code parses these keys, so the separator and field order are
//! part of the compatibility contract.

use std::borrow::Borrow;
use std::fmt;

/// Separator placed between attribute values of an [`IndexKey`].
pub const INDEX_KEY_SEPARATOR: char = '/';

/// A secondary index key, e.g. `domain/project/serviceId`.
///
/// # Example
///
/// ```rust
/// use sd_core::IndexKey;
///
/// let key = IndexKey::from_parts(["default", "default", "app", "svc", "1.0.0"]);
/// assert_eq!(key.as_str(), "default/default/app/svc/1.0.0");
/// assert_eq!(key.parts().count(), 5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey(String);

impl IndexKey {
    /// Create an index key from an already joined string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Join attribute values in order with [`INDEX_KEY_SEPARATOR`].
    #[must_use]
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                key.push(INDEX_KEY_SEPARATOR);
            }
            key.push_str(part.as_ref());
        }
        Self(key)
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into its attribute values.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split(INDEX_KEY_SEPARATOR)
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for IndexKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IndexKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for IndexKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for IndexKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
