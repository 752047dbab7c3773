//! Entity trait for records held in a mirror cache.

use std::fmt;

/// A record kind that can be mirrored in an entity cache.
///
/// The entity type is fixed per cache instance, so a value of the wrong kind
/// can never reach a cache. What remains is a per-kind validity predicate:
/// documents that decode but lack a required sub-record are skipped by the
/// cache instead of being stored.
///
/// Equality is structural and is what the cache uses to detect that an update
/// carries the value it already holds.
///
/// # Example
///
/// ```rust
/// use sd_core::Entity;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Rule {
///     name: String,
///     pattern: Option<String>,
/// }
///
/// impl Entity for Rule {
///     const KIND: &'static str = "rule";
///
///     fn is_valid(&self) -> bool {
///         self.pattern.is_some()
///     }
/// }
///
/// let rule = Rule { name: "r1".into(), pattern: None };
/// assert!(!rule.is_valid());
/// ```
pub trait Entity: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Entity-kind name, also the default name of caches holding this kind.
    const KIND: &'static str;

    /// Whether this value is complete enough to be cached and indexed.
    fn is_valid(&self) -> bool {
        true
    }
}
