//! Ordered registry of index functions.

use std::fmt;
use std::sync::Arc;

use sd_core::IndexKey;

/// An index function: derives one index key from an entity.
///
/// Returns `None` when the value lacks the attributes the key is built from,
/// so malformed values produce no index entry rather than a wrong one.
pub type IndexFn<E> = Arc<dyn Fn(&E) -> Option<IndexKey> + Send + Sync>;

/// Ordered collection of index functions for one entity kind.
///
/// Functions are registered once while a cache is being built and are not
/// mutated afterwards.
///
/// # Example
///
/// ```rust
/// use sd_cache::IndexFuncs;
/// use sd_core::IndexKey;
///
/// let mut funcs = IndexFuncs::<(String, String)>::new();
/// funcs.add_index_func(|(name, _)| Some(IndexKey::from(name.as_str())));
/// funcs.add_index_func(|(name, env)| Some(IndexKey::from_parts([env, name])));
///
/// let keys = funcs.get_indexes(&("svc-a".to_string(), "prod".to_string()));
/// assert_eq!(keys, vec![IndexKey::from("svc-a"), IndexKey::from("prod/svc-a")]);
/// ```
pub struct IndexFuncs<E> {
    funcs: Vec<IndexFn<E>>,
}

impl<E> IndexFuncs<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { funcs: Vec::new() }
    }

    /// Append an index function.
    pub fn add_index_func<F>(&mut self, func: F) -> &mut Self
    where
        F: Fn(&E) -> Option<IndexKey> + Send + Sync + 'static,
    {
        self.funcs.push(Arc::new(func));
        self
    }

    /// Builder-style variant of [`add_index_func`](Self::add_index_func).
    pub fn with<F>(mut self, func: F) -> Self
    where
        F: Fn(&E) -> Option<IndexKey> + Send + Sync + 'static,
    {
        self.add_index_func(func);
        self
    }

    /// Apply every function in registration order.
    ///
    /// Duplicates are kept when two functions agree; applying the result
    /// to an index is idempotent anyway.
    pub fn get_indexes(&self, value: &E) -> Vec<IndexKey> {
        self.funcs.iter().filter_map(|func| func(value)).collect()
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Whether no function is registered.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

impl<E> Default for IndexFuncs<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for IndexFuncs<E> {
    fn clone(&self) -> Self {
        Self {
            funcs: self.funcs.clone(),
        }
    }
}

impl<E> fmt::Debug for IndexFuncs<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexFuncs")
            .field("len", &self.funcs.len())
            .finish()
    }
}
