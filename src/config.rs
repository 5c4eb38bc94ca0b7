//! Configuration resolution for a concurrent hash map.
//!
//! A [`Config`] holds the initial capacity, the hash function and the key
//! equality function of a map. It is resolved exactly once, at construction
//! time, from zero or more overrides plus built-in defaults:
//!
//! 1. The initial capacity starts at [`DEFAULT_INITIAL_CAPACITY`].
//! 2. Overrides are applied in the order given. Each one sets exactly one
//!    field, and a later override of the same field wins.
//! 3. A hash function or equality function that is still unset is filled in
//!    with the default: a [`DefaultHashBuilder`]-based hasher and `==`.
//!
//! Overrides can be given as a list of [`Opt`] directives passed to
//! [`resolve`], or as setter calls on a [`ConfigBuilder`]. Both surfaces go
//! through the same code path and produce identical configurations. The
//! resulting `Config` has no setters, so it cannot be changed once it has
//! been handed to other threads; use [`Config::to_builder`] to derive a new
//! one instead.
//!
//! # Hash and equality consistency
//!
//! If two keys are equal according to the equality function, their hashes
//! must be equal:
//!
//! ```text
//! eq(k1, k2) -> hash(k1) == hash(k2)
//! ```
//!
//! This is not checked. A map configured with an inconsistent pair will
//! silently miss entries on lookup.

mod builder;
mod opt;

pub use builder::ConfigBuilder;
pub use opt::{with_build_hasher, with_comparator, with_hasher, with_initial_capacity, Opt};

use std::{
    fmt,
    hash::{BuildHasher, Hash, Hasher},
    sync::Arc,
};

/// The initial capacity used when none is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Default hasher for [`Config`].
///
/// This is the `RandomState` of the [`aHash`] crate. A configuration that does
/// not override its hash function uses it with the fixed [`DEFAULT_HASH_SEEDS`],
/// so every default configuration hashes a given key to the same value,
/// whether it was resolved from directives or built with setters. Maps that
/// hash untrusted keys should plug in a randomly seeded hasher with
/// [`ConfigBuilder::build_hasher`] or [`with_build_hasher`].
///
/// [`aHash`]: https://crates.io/crates/ahash
pub type DefaultHashBuilder = ahash::RandomState;

/// Seeds of the [`DefaultHashBuilder`] behind the default hash function.
pub const DEFAULT_HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// A hash function mapping a key to a pointer-width integer.
///
/// It must be a pure, deterministic function of the key's value.
pub type HashFn<K> = Arc<dyn Fn(&K) -> usize + Send + Sync + 'static>;

/// A key equality function.
///
/// It must be reflexive, symmetric, transitive, and consistent with the
/// [`HashFn`] it is configured together with.
pub type EqualFn<K> = Arc<dyn Fn(&K, &K) -> bool + Send + Sync + 'static>;

/// Resolves a configuration from an ordered list of directives.
///
/// This is a shorthand for
/// `ConfigBuilder::new().apply_all(opts).build()`.
///
/// # Examples
///
/// ```rust
/// use conmap::config::{self, Config, DEFAULT_INITIAL_CAPACITY};
///
/// let defaults: Config<u64> = config::resolve([]);
/// assert_eq!(defaults.initial_capacity(), DEFAULT_INITIAL_CAPACITY);
///
/// let config: Config<u64> = config::resolve([
///     config::with_initial_capacity(64),
///     config::with_initial_capacity(128),
/// ]);
/// assert_eq!(config.initial_capacity(), 128);
/// ```
pub fn resolve<K, I>(opts: I) -> Config<K>
where
    K: Hash + Eq + 'static,
    I: IntoIterator<Item = Opt<K>>,
{
    ConfigBuilder::new().apply_all(opts).build()
}

/// The resolved, immutable configuration of a map.
///
/// All fields are always populated. Cloning a `Config` is cheap and shares the
/// hash and equality functions; a clone hashes exactly like the original.
pub struct Config<K> {
    initial_capacity: usize,
    hasher: HashFn<K>,
    comparator: EqualFn<K>,
}

impl<K> Config<K>
where
    K: Hash + Eq + 'static,
{
    /// Returns a new [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder<K> {
        ConfigBuilder::new()
    }
}

impl<K> Config<K> {
    /// Returns the initial capacity.
    ///
    /// This is a sizing hint for the map, not a limit on the number of
    /// entries.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Hashes `key` with the configured hash function.
    pub fn hash(&self, key: &K) -> usize {
        (self.hasher)(key)
    }

    /// Compares two keys with the configured equality function.
    pub fn keys_equal(&self, a: &K, b: &K) -> bool {
        (self.comparator)(a, b)
    }

    /// Returns the configured hash function.
    pub fn hasher(&self) -> &HashFn<K> {
        &self.hasher
    }

    /// Returns the configured equality function.
    pub fn comparator(&self) -> &EqualFn<K> {
        &self.comparator
    }

    /// Returns a builder holding this configuration's settings.
    ///
    /// Building it without further changes yields a configuration that
    /// behaves exactly like this one. `self` is not affected by anything done
    /// to the builder.
    pub fn to_builder(&self) -> ConfigBuilder<K> {
        ConfigBuilder::from_parts(
            self.initial_capacity,
            Some(Arc::clone(&self.hasher)),
            Some(Arc::clone(&self.comparator)),
        )
    }
}

impl<K> Clone for Config<K> {
    fn clone(&self) -> Self {
        Self {
            initial_capacity: self.initial_capacity,
            hasher: Arc::clone(&self.hasher),
            comparator: Arc::clone(&self.comparator),
        }
    }
}

impl<K> fmt::Debug for Config<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("initial_capacity", &self.initial_capacity)
            .finish_non_exhaustive()
    }
}

pub(crate) fn hash_fn_from<K, S>(build_hasher: S) -> HashFn<K>
where
    K: Hash + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    Arc::new(move |key: &K| {
        let mut hasher = build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish() as usize
    })
}

fn default_hasher<K: Hash + 'static>() -> HashFn<K> {
    let [k0, k1, k2, k3] = DEFAULT_HASH_SEEDS;
    hash_fn_from(DefaultHashBuilder::with_seeds(k0, k1, k2, k3))
}

fn default_comparator<K: Eq + 'static>() -> EqualFn<K> {
    Arc::new(|a: &K, b: &K| a == b)
}

#[cfg(test)]
mod tests {
    use super::{
        resolve, with_comparator, with_hasher, with_initial_capacity, Config, ConfigBuilder,
        DefaultHashBuilder, DEFAULT_HASH_SEEDS, DEFAULT_INITIAL_CAPACITY,
    };

    use std::{sync::Arc, thread};

    #[test]
    fn defaults() {
        let config: Config<&str> = resolve([]);

        assert_eq!(config.initial_capacity(), DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.hash(&"alice"), config.hash(&"alice"));
        assert!(config.keys_equal(&"alice", &"alice"));
        assert!(!config.keys_equal(&"alice", &"bob"));
    }

    #[test]
    fn last_write_wins() {
        let config: Config<u32> = resolve([with_initial_capacity(64), with_initial_capacity(128)]);
        assert_eq!(config.initial_capacity(), 128);

        let config: Config<u32> = resolve([
            with_hasher(|_: &u32| 1),
            with_initial_capacity(16),
            with_hasher(|k: &u32| *k as usize * 2),
        ]);
        assert_eq!(config.initial_capacity(), 16);
        assert_eq!(config.hash(&21), 42);
    }

    #[test]
    fn partial_override_fills_the_rest() {
        let config: Config<String> = resolve([with_hasher(|s: &String| s.len())]);

        assert_eq!(config.initial_capacity(), DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.hash(&"abc".to_string()), 3);
        // The default comparator is `==`.
        assert!(config.keys_equal(&"abc".to_string(), &"abc".to_string()));
        assert!(!config.keys_equal(&"abc".to_string(), &"xyz".to_string()));
    }

    #[test]
    fn comparator_override() {
        let config: Config<String> = resolve([
            with_hasher(|s: &String| s.to_ascii_lowercase().len()),
            with_comparator(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
        ]);

        let one = "One".to_string();
        let lower = "one".to_string();
        assert!(config.keys_equal(&one, &lower));
        assert_eq!(config.hash(&one), config.hash(&lower));
    }

    #[test]
    fn default_hasher_is_the_same_for_every_config() {
        let from_opts: Config<u64> = resolve([with_initial_capacity(64)]);
        let from_setters: Config<u64> = ConfigBuilder::new().initial_capacity(64).build();
        let from_nothing: Config<u64> = resolve([]);

        let [k0, k1, k2, k3] = DEFAULT_HASH_SEEDS;
        let state = DefaultHashBuilder::with_seeds(k0, k1, k2, k3);

        for key in 0..100_u64 {
            let expected = {
                use std::hash::{BuildHasher, Hash, Hasher};

                let mut hasher = state.build_hasher();
                key.hash(&mut hasher);
                hasher.finish() as usize
            };
            assert_eq!(from_opts.hash(&key), expected);
            assert_eq!(from_setters.hash(&key), expected);
            assert_eq!(from_nothing.hash(&key), expected);
        }
    }

    #[test]
    fn clone_hashes_like_the_original() {
        let config: Config<u64> = resolve([]);
        let cloned = config.clone();

        for key in 0..100 {
            assert_eq!(config.hash(&key), cloned.hash(&key));
        }
        assert!(Arc::ptr_eq(config.hasher(), cloned.hasher()));
        assert!(Arc::ptr_eq(config.comparator(), cloned.comparator()));
    }

    #[test]
    fn to_builder_round_trip_keeps_functions() {
        let config: Config<u64> = resolve([with_initial_capacity(32)]);
        let rebuilt = config.to_builder().build();

        assert_eq!(rebuilt.initial_capacity(), 32);
        for key in 0..100 {
            assert_eq!(config.hash(&key), rebuilt.hash(&key));
        }

        let resized = config.to_builder().initial_capacity(256).build();
        assert_eq!(resized.initial_capacity(), 256);
        // The original is untouched.
        assert_eq!(config.initial_capacity(), 32);
    }

    #[test]
    fn shared_across_threads() {
        let config: Arc<Config<u64>> = Arc::new(resolve([]));
        let expected: Vec<_> = (0..64).map(|k| config.hash(&k)).collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = Arc::clone(&config);
                thread::spawn(move || (0..64).map(|k| config.hash(&k)).collect::<Vec<_>>())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn debug_output() {
        let config: Config<u8> = resolve([with_initial_capacity(3)]);
        assert_eq!(format!("{config:?}"), "Config { initial_capacity: 3, .. }");
    }
}
