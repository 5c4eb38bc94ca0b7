use super::{
    default_comparator, default_hasher, hash_fn_from, Config, EqualFn, HashFn, Opt,
    DEFAULT_INITIAL_CAPACITY,
};

use std::{
    fmt,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

/// Builds a [`Config`] with various configuration knobs.
///
/// Setter calls and [`Opt`] directives are interchangeable: every setter is
/// applied as the matching directive, in call order, and the last value given
/// for a field wins. Fields left unset are defaulted by [`build`].
///
/// The builder is an owned value, so all configuration happens before the
/// resulting `Config` can be shared with other threads.
///
/// # Examples
///
/// ```rust
/// use conmap::config::{Config, ConfigBuilder};
///
/// let config: Config<String> = ConfigBuilder::new()
///     .initial_capacity(1_024)
///     // Case-insensitive keys. The hasher must agree with the comparator.
///     .hasher(|s: &String| s.to_ascii_lowercase().len())
///     .comparator(|a: &String, b: &String| a.eq_ignore_ascii_case(b))
///     .build();
///
/// assert_eq!(config.initial_capacity(), 1_024);
/// assert!(config.keys_equal(&"Two".into(), &"two".into()));
/// ```
///
/// [`build`]: #method.build
pub struct ConfigBuilder<K> {
    initial_capacity: usize,
    hasher: Option<HashFn<K>>,
    comparator: Option<EqualFn<K>>,
}

impl<K> ConfigBuilder<K> {
    /// Construct a new `ConfigBuilder` with the default initial capacity and
    /// no hash or equality function set.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_INITIAL_CAPACITY, None, None)
    }

    pub(crate) fn from_parts(
        initial_capacity: usize,
        hasher: Option<HashFn<K>>,
        comparator: Option<EqualFn<K>>,
    ) -> Self {
        Self {
            initial_capacity,
            hasher,
            comparator,
        }
    }

    /// Applies a single directive.
    pub fn apply(self, opt: Opt<K>) -> Self {
        match opt {
            Opt::InitialCapacity(initial_capacity) => Self {
                initial_capacity,
                ..self
            },
            Opt::Hasher(hasher) => Self {
                hasher: Some(hasher),
                ..self
            },
            Opt::Comparator(comparator) => Self {
                comparator: Some(comparator),
                ..self
            },
        }
    }

    /// Applies directives in order.
    pub fn apply_all<I>(self, opts: I) -> Self
    where
        I: IntoIterator<Item = Opt<K>>,
    {
        opts.into_iter().fold(self, Self::apply)
    }

    /// Sets the initial capacity of the map.
    pub fn initial_capacity(self, capacity: usize) -> Self {
        self.apply(Opt::InitialCapacity(capacity))
    }

    /// Sets the hash function.
    pub fn hasher<F>(self, hasher: F) -> Self
    where
        F: Fn(&K) -> usize + Send + Sync + 'static,
    {
        self.apply(Opt::Hasher(Arc::new(hasher)))
    }

    /// Sets the hash function to one that hashes keys with `build_hasher`.
    pub fn build_hasher<S>(self, build_hasher: S) -> Self
    where
        K: Hash + 'static,
        S: BuildHasher + Send + Sync + 'static,
    {
        self.apply(Opt::Hasher(hash_fn_from(build_hasher)))
    }

    /// Sets the key equality function.
    pub fn comparator<F>(self, comparator: F) -> Self
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        self.apply(Opt::Comparator(Arc::new(comparator)))
    }
}

impl<K> ConfigBuilder<K>
where
    K: Hash + Eq + 'static,
{
    /// Builds the `Config`, filling unset fields with their defaults.
    ///
    /// The hash function defaults to one built from a
    /// [`DefaultHashBuilder`](super::DefaultHashBuilder) seeded with
    /// [`DEFAULT_HASH_SEEDS`](super::DEFAULT_HASH_SEEDS), and the equality
    /// function defaults to `==`.
    pub fn build(self) -> Config<K> {
        #[cfg(feature = "logging")]
        log::debug!(
            "Resolved map configuration: initial_capacity: {}, default hasher: {}, default comparator: {}",
            self.initial_capacity,
            self.hasher.is_none(),
            self.comparator.is_none()
        );

        Config {
            initial_capacity: self.initial_capacity,
            hasher: self.hasher.unwrap_or_else(default_hasher),
            comparator: self.comparator.unwrap_or_else(default_comparator),
        }
    }
}

impl<K> Default for ConfigBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for ConfigBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("initial_capacity", &self.initial_capacity)
            .field("hasher_set", &self.hasher.is_some())
            .field("comparator_set", &self.comparator.is_some())
            .finish()
    }
}
