//! No-copy atomic cells.
//!
//! Each cell is a single word-sized (or pointer-sized) location in memory
//! that is accessed exclusively through atomic operations. Every operation on
//! one cell is linearizable: it appears to take effect at a single instant
//! that is consistent with a global order of all operations on that cell. No
//! ordering is promised across *different* cells; algorithms that need a
//! multi-cell invariant have to build it themselves, e.g. with a retry loop
//! that reads one cell and conditionally writes another.
//!
//! None of the cells implement `Clone` or `Copy`. A cell is meant to be
//! embedded in a larger structure (a bucket head, a size counter) and shared
//! by reference, so that every thread synchronizes on the same address.
//!
//! Nothing here blocks, sleeps or yields. A failed compare-and-swap is an
//! expected outcome, reported through the return value, and the caller decides
//! whether and how to retry.

mod integer;
mod pointer;

pub use integer::{AtomicU32Cell, AtomicUsizeCell};
pub use pointer::AtomicPtrCell;
