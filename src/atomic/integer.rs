use std::{
    fmt,
    sync::atomic::{AtomicU32, AtomicUsize, Ordering},
};

macro_rules! atomic_int_cell {
    (
        $(#[$attr:meta])*
        $name:ident, $atomic:ty, $int:ty
    ) => {
        $(#[$attr])*
        #[repr(transparent)]
        pub struct $name {
            value: $atomic,
        }

        impl $name {
            /// Creates a new cell holding `value`.
            pub const fn new(value: $int) -> Self {
                Self {
                    value: <$atomic>::new(value),
                }
            }

            /// Returns the current value.
            pub fn load(&self) -> $int {
                self.value.load(Ordering::SeqCst)
            }

            /// Replaces the current value with `value`.
            pub fn store(&self, value: $int) {
                self.value.store(value, Ordering::SeqCst);
            }

            /// Adds `delta` to the current value and returns the value *after*
            /// the addition.
            ///
            /// The addition wraps around on overflow, so adding the two's
            /// complement of `n` (`n.wrapping_neg()`) subtracts `n`.
            pub fn add(&self, delta: $int) -> $int {
                self.value
                    .fetch_add(delta, Ordering::SeqCst)
                    .wrapping_add(delta)
            }

            /// Replaces the current value with `value` and returns the value it
            /// held immediately before.
            pub fn swap(&self, value: $int) -> $int {
                self.value.swap(value, Ordering::SeqCst)
            }

            /// Replaces the current value with `new` if, and only if, it is
            /// `old` at the moment of the attempt.
            ///
            /// Returns `true` on success. On `false` the cell is left unchanged;
            /// this is the normal outcome under contention, not an error.
            pub fn compare_and_swap(&self, old: $int, new: $int) -> bool {
                self.value
                    .compare_exchange(old, new, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
            }

            /// Returns a mutable reference to the value.
            ///
            /// This needs exclusive access to the cell, so no other thread can
            /// be observing it.
            pub fn get_mut(&mut self) -> &mut $int {
                self.value.get_mut()
            }

            /// Consumes the cell and returns the value.
            pub fn into_inner(self) -> $int {
                self.value.into_inner()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(0)
            }
        }

        impl From<$int> for $name {
            fn from(value: $int) -> Self {
                Self::new(value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.load()).finish()
            }
        }
    };
}

atomic_int_cell! {
    /// An unsigned 32-bit integer that is only accessed atomically.
    ///
    /// All operations are sequentially consistent. The cell is not `Clone`;
    /// share it by reference (or embed it in a structure that is shared).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conmap::atomic::AtomicU32Cell;
    ///
    /// let cell = AtomicU32Cell::new(5);
    /// assert!(cell.compare_and_swap(5, 9));
    /// assert!(!cell.compare_and_swap(5, 1));
    /// assert_eq!(cell.load(), 9);
    /// ```
    AtomicU32Cell, AtomicU32, u32
}

atomic_int_cell! {
    /// A pointer-width unsigned integer that is only accessed atomically.
    ///
    /// Sized to `usize` so it can hold entry counters, generation stamps or
    /// version tags that take part in pointer-sized arithmetic, e.g. to detect
    /// that a concurrent resize has started a new generation.
    ///
    /// All operations are sequentially consistent. The cell is not `Clone`;
    /// share it by reference (or embed it in a structure that is shared).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conmap::atomic::AtomicUsizeCell;
    ///
    /// let len = AtomicUsizeCell::default();
    /// assert_eq!(len.add(1), 1);
    /// assert_eq!(len.add(1_usize.wrapping_neg()), 0);
    /// ```
    AtomicUsizeCell, AtomicUsize, usize
}
