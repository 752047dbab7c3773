//! Change detection between a cached value and an incoming one.

use std::collections::HashSet;

use sd_core::IndexKey;

/// Whether `new` is structurally identical to `old`.
///
/// The synchronization engine uses this to skip redundant downstream work,
/// such as a watch notification, when an update carries the cached value.
#[inline]
pub fn is_value_unchanged<E: PartialEq>(old: &E, new: &E) -> bool {
    old == new
}

/// Index keys present in `old` but missing from `new`, each listed once in
/// the order of its first occurrence in `old`.
///
/// These are the entries to retract when an update replaces `old` by `new`
/// under [`IndexUpdatePolicy::Retract`](crate::IndexUpdatePolicy::Retract).
pub fn stale_index_keys(old: &[IndexKey], new: &[IndexKey]) -> Vec<IndexKey> {
    let mut seen = HashSet::new();
    old.iter()
        .filter(|k| !new.contains(k) && seen.insert(*k))
        .cloned()
        .collect()
}
