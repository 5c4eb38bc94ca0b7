use super::{hash_fn_from, EqualFn, HashFn};

use std::{
    fmt,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

/// A single configuration override.
///
/// Directives are applied in order by [`resolve`](super::resolve) or
/// [`ConfigBuilder::apply`](super::ConfigBuilder::apply). Each one sets
/// exactly one field; when the same field is set more than once, the last
/// directive wins.
pub enum Opt<K> {
    /// Sets the initial capacity of the map.
    InitialCapacity(usize),
    /// Sets the hash function.
    Hasher(HashFn<K>),
    /// Sets the key equality function.
    Comparator(EqualFn<K>),
}

impl<K> Clone for Opt<K> {
    fn clone(&self) -> Self {
        match self {
            Self::InitialCapacity(capacity) => Self::InitialCapacity(*capacity),
            Self::Hasher(hasher) => Self::Hasher(Arc::clone(hasher)),
            Self::Comparator(comparator) => Self::Comparator(Arc::clone(comparator)),
        }
    }
}

impl<K> fmt::Debug for Opt<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialCapacity(capacity) => {
                f.debug_tuple("InitialCapacity").field(capacity).finish()
            }
            Self::Hasher(_) => f.write_str("Hasher(..)"),
            Self::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

/// Returns a directive that sets the initial capacity.
pub fn with_initial_capacity<K>(capacity: usize) -> Opt<K> {
    Opt::InitialCapacity(capacity)
}

/// Returns a directive that sets the hash function.
pub fn with_hasher<K, F>(hasher: F) -> Opt<K>
where
    F: Fn(&K) -> usize + Send + Sync + 'static,
{
    Opt::Hasher(Arc::new(hasher))
}

/// Returns a directive that hashes keys with `build_hasher`.
pub fn with_build_hasher<K, S>(build_hasher: S) -> Opt<K>
where
    K: Hash + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    Opt::Hasher(hash_fn_from(build_hasher))
}

/// Returns a directive that sets the key equality function.
pub fn with_comparator<K, F>(comparator: F) -> Opt<K>
where
    F: Fn(&K, &K) -> bool + Send + Sync + 'static,
{
    Opt::Comparator(Arc::new(comparator))
}
