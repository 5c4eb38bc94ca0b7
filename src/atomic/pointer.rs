use std::{fmt, sync::atomic::Ordering};

use crossbeam_epoch::{self as epoch, Atomic, CompareExchangeError, Guard, Owned, Shared};

/// A nullable pointer to a `T` that is only accessed atomically.
///
/// The cell owns its pointee. Installing a new pointee with [`store`],
/// [`swap`], [`take`] or a successful [`compare_and_swap`] retires the one
/// it replaces: the old pointee is handed to the epoch-based collector of
/// [`crossbeam_epoch`] and destroyed only after every thread that could still
/// be reading it has unpinned its [`Guard`].
///
/// References returned by [`load`] and [`swap`] are transient views. They
/// borrow both the guard that was used to obtain them and the cell itself, so
/// they can outlive neither; re-load under a new guard to observe the cell
/// again. A view keeps the cell borrowed, which means the cell cannot be
/// dropped, consumed with [`into_owned`] or mutated through [`get_mut`] while
/// it is alive:
///
/// ```compile_fail
/// use conmap::atomic::AtomicPtrCell;
/// use crossbeam_epoch as epoch;
///
/// let guard = epoch::pin();
/// let view = {
///     let cell = AtomicPtrCell::new(42);
///     cell.load(&guard)
/// };
/// assert_eq!(view, Some(&42));
/// ```
///
/// ```compile_fail
/// use conmap::atomic::AtomicPtrCell;
/// use crossbeam_epoch as epoch;
///
/// let mut cell = AtomicPtrCell::new(42);
/// let guard = epoch::pin();
/// let view = cell.load(&guard);
/// *cell.get_mut().unwrap() = 7;
/// assert_eq!(view, Some(&42));
/// ```
///
/// ```compile_fail
/// use conmap::atomic::AtomicPtrCell;
/// use crossbeam_epoch::{self as epoch, Owned};
///
/// let cell = AtomicPtrCell::new(1);
/// let guard = epoch::pin();
/// let previous = cell.swap(Owned::new(2), &guard);
/// drop(cell.into_owned());
/// assert_eq!(previous, Some(&1));
/// ```
///
/// This is the primitive used to install nodes in a lock-free linked
/// structure. A writer builds a new node, reads the current head with
/// [`load_shared`], and attempts [`compare_exchange`]. If another writer got
/// there first, the rejected node is handed back and the writer re-reads the
/// head and retries. That retry loop, and any backoff it uses, belongs to the
/// caller.
///
/// # Examples
///
/// ```rust
/// use conmap::atomic::AtomicPtrCell;
/// use crossbeam_epoch::{self as epoch, Owned};
///
/// let cell = AtomicPtrCell::new("A");
/// let guard = epoch::pin();
///
/// assert_eq!(cell.swap(Owned::new("B"), &guard), Some(&"A"));
/// assert_eq!(cell.load(&guard), Some(&"B"));
/// ```
///
/// [`store`]: #method.store
/// [`swap`]: #method.swap
/// [`take`]: #method.take
/// [`load`]: #method.load
/// [`load_shared`]: #method.load_shared
/// [`get_mut`]: #method.get_mut
/// [`into_owned`]: #method.into_owned
/// [`compare_and_swap`]: #method.compare_and_swap
/// [`compare_exchange`]: #method.compare_exchange
pub struct AtomicPtrCell<T> {
    inner: Atomic<T>,
}

impl<T> AtomicPtrCell<T> {
    /// Creates a cell holding a null pointer.
    pub fn null() -> Self {
        Self {
            inner: Atomic::null(),
        }
    }

    /// Creates a cell owning a freshly allocated `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Atomic::new(value),
        }
    }

    /// Returns a view of the current pointee, or `None` if the cell is null.
    ///
    /// The view is valid for as long as both `guard` and the borrow of the
    /// cell are alive.
    pub fn load<'g>(&'g self, guard: &'g Guard) -> Option<&'g T> {
        // Safety: non-null pointers in the cell always point to a live
        // allocation. A retired pointee is not freed while `guard` is pinned,
        // and the current one is not freed while the cell is borrowed.
        unsafe { self.inner.load(Ordering::Acquire, guard).as_ref() }
    }

    /// Returns the current pointer, for use as the expected value of a later
    /// [`compare_and_swap`](#method.compare_and_swap) or
    /// [`compare_exchange`](#method.compare_exchange).
    pub fn load_shared<'g>(&'g self, guard: &'g Guard) -> Shared<'g, T> {
        self.inner.load(Ordering::Acquire, guard)
    }

    /// Returns `true` if the cell currently holds a null pointer.
    pub fn is_null(&self, guard: &Guard) -> bool {
        self.inner.load(Ordering::Acquire, guard).is_null()
    }

    /// Returns a mutable reference to the pointee.
    ///
    /// This needs exclusive access to the cell, so no other thread can be
    /// observing it.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // Safety: `&mut self` rules out concurrent access, so there is nothing
        // to pin against.
        unsafe {
            let current = self.inner.load(Ordering::Relaxed, epoch::unprotected());
            (current.as_raw() as *mut T).as_mut()
        }
    }

    /// Consumes the cell and returns the pointee, if any.
    pub fn into_owned(self) -> Option<T> {
        // Safety: we own the cell, so no other thread can observe it. The swap
        // leaves null behind for `drop`.
        unsafe {
            let guard = epoch::unprotected();
            let current = self.inner.swap(Shared::null(), Ordering::Relaxed, guard);
            if current.is_null() {
                None
            } else {
                Some(*current.into_owned().into_box())
            }
        }
    }
}

impl<T: Send + 'static> AtomicPtrCell<T> {
    /// Installs `new`, retiring the previous pointee.
    pub fn store(&self, new: Owned<T>, guard: &Guard) {
        let previous = self.inner.swap(new, Ordering::AcqRel, guard);
        Self::retire(previous, guard);
    }

    /// Installs `new` and returns a view of the pointee it replaced, or `None`
    /// if the cell was null.
    ///
    /// The previous pointee is retired; the returned view stays valid for as
    /// long as `guard` is alive.
    pub fn swap<'g>(&'g self, new: Owned<T>, guard: &'g Guard) -> Option<&'g T> {
        let previous = self.inner.swap(new, Ordering::AcqRel, guard);
        Self::retire(previous, guard);
        // Safety: `previous` was just retired under `guard`, so it outlives
        // `'g`.
        unsafe { previous.as_ref() }
    }

    /// Replaces the pointee with a null pointer and returns a view of it, or
    /// `None` if the cell was already null.
    pub fn take<'g>(&'g self, guard: &'g Guard) -> Option<&'g T> {
        let previous = self.inner.swap(Shared::null(), Ordering::AcqRel, guard);
        Self::retire(previous, guard);
        // Safety: see `swap`.
        unsafe { previous.as_ref() }
    }

    /// Installs `new` if, and only if, the cell still holds exactly `current`
    /// (pointer identity, not value equality).
    ///
    /// Returns `true` on success, in which case `current` is retired. On
    /// `false` the cell is left unchanged and `new`, which was never visible to
    /// other threads, is dropped. Use
    /// [`compare_exchange`](#method.compare_exchange) to get `new` back for a
    /// retry.
    pub fn compare_and_swap<'g>(
        &'g self,
        current: Shared<'g, T>,
        new: Owned<T>,
        guard: &'g Guard,
    ) -> bool {
        self.compare_exchange(current, new, guard).is_ok()
    }

    /// Installs `new` if, and only if, the cell still holds exactly `current`.
    ///
    /// On success `current` is retired and the newly installed pointer is
    /// returned. On failure the cell is left unchanged and `new` is handed
    /// back, so the caller can re-read the cell and retry without allocating
    /// again.
    pub fn compare_exchange<'g>(
        &'g self,
        current: Shared<'g, T>,
        new: Owned<T>,
        guard: &'g Guard,
    ) -> Result<Shared<'g, T>, Owned<T>> {
        match self
            .inner
            .compare_exchange(current, new, Ordering::AcqRel, Ordering::Acquire, guard)
        {
            Ok(installed) => {
                Self::retire(current, guard);
                Ok(installed)
            }
            Err(CompareExchangeError { new, .. }) => Err(new),
        }
    }

    fn retire(ptr: Shared<'_, T>, guard: &Guard) {
        if !ptr.is_null() {
            // Safety: `ptr` has just been unlinked from the cell, so no new
            // reader can reach it, and threads already reading it are pinned.
            unsafe { guard.defer_destroy(ptr) };
        }
    }
}

impl<T> Default for AtomicPtrCell<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Owned<T>> for AtomicPtrCell<T> {
    fn from(owned: Owned<T>) -> Self {
        Self {
            inner: Atomic::from(owned),
        }
    }
}

impl<T> Drop for AtomicPtrCell<T> {
    fn drop(&mut self) {
        // Safety: `&mut self` rules out concurrent access, and the pointee was
        // never retired, so it is freed exactly once here.
        unsafe {
            let guard = epoch::unprotected();
            let current = self.inner.load(Ordering::Relaxed, guard);
            if !current.is_null() {
                drop(current.into_owned());
            }
        }
    }
}

impl<T> fmt::Debug for AtomicPtrCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicPtrCell").field(&self.inner).finish()
    }
}
