#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

//! Building blocks for a concurrent, resizable hash map.
//!
//! This crate provides two independent pieces that a lock-free map is put
//! together from:
//!
//! - The [`atomic`] module has a family of no-copy atomic cells:
//!   [`AtomicU32Cell`][atomic-u32], [`AtomicUsizeCell`][atomic-usize] and
//!   [`AtomicPtrCell`][atomic-ptr]. A cell is a single word of shared memory
//!   that is only ever accessed through atomic operations. Cells are neither
//!   `Clone` nor `Copy`, so a cell embedded in a bucket head or a size counter
//!   can never be split into two independently mutable copies.
//! - The [`config`] module resolves the configuration of a map: its initial
//!   capacity, the hash function and the key equality function. Overrides are
//!   given either as a list of [`Opt`][opt] directives or through setter calls
//!   on a [`ConfigBuilder`][builder]; both surfaces end in the same immutable
//!   [`Config`][config-struct] that is safe to share across threads.
//!
//! The bucket layout, collision strategy and the resize protocol that consume
//! these pieces are not part of this crate.
//!
//! [atomic-u32]: ./atomic/struct.AtomicU32Cell.html
//! [atomic-usize]: ./atomic/struct.AtomicUsizeCell.html
//! [atomic-ptr]: ./atomic/struct.AtomicPtrCell.html
//! [opt]: ./config/enum.Opt.html
//! [builder]: ./config/struct.ConfigBuilder.html
//! [config-struct]: ./config/struct.Config.html
//!
//! # Example
//!
//! ```rust
//! use conmap::atomic::{AtomicPtrCell, AtomicUsizeCell};
//! use conmap::config::{self, Config};
//!
//! // Resolve the configuration once, before anything is shared.
//! let config: Config<String> = config::resolve([
//!     config::with_initial_capacity(64),
//!     config::with_comparator(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
//!     config::with_hasher(|s: &String| s.len()),
//! ]);
//! assert_eq!(config.initial_capacity(), 64);
//! assert!(config.keys_equal(&"One".to_string(), &"one".to_string()));
//!
//! // Cells for a bucket head and an entry counter.
//! let head: AtomicPtrCell<String> = AtomicPtrCell::null();
//! let len = AtomicUsizeCell::new(0);
//!
//! let guard = crossbeam_epoch::pin();
//! let observed = head.load_shared(&guard);
//! if head.compare_and_swap(observed, crossbeam_epoch::Owned::new("one".into()), &guard) {
//!     assert_eq!(len.add(1), 1);
//! }
//! assert_eq!(head.load(&guard).map(String::as_str), Some("one"));
//! ```

pub mod atomic;
pub mod config;

#[cfg(test)]
pub(crate) mod test_util;

pub use atomic::{AtomicPtrCell, AtomicU32Cell, AtomicUsizeCell};
pub use config::{Config, ConfigBuilder, Opt};
