//! float-dict: an open-addressing dictionary keyed by `f64`, using a
//! legacy float hash and perturbation probing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the probing, growth and iteration engine in one structural
//!   layer with small, checkable invariants, and put the typed surfaces on
//!   top of it.
//! - Layers:
//!   - `hash`: the float hash, the pair combiner and the sealed `TableKey`
//!     trait that binds a key type to its hash.
//!   - `probe::Probe`: the perturbed probe sequence as a pure position step.
//!   - `RawTable<K, V>`: the slot array (`Empty`/`Tombstone`/`Used`), the
//!     occupied span, growth, removal and iteration.
//!   - `FloatDict<V>`: the public `f64 -> V` dictionary.
//!   - `PairSet`: the public set of `(f64, f64)` tuples.
//!
//! Constraints
//! - Single-threaded; tables are plain owned data with no interior
//!   mutability.
//! - Capacity is a power of two and at least 8. A table grows fourfold once
//!   more than two thirds of its slots are live.
//! - Live entries plus tombstones never exceed two thirds of the slots, so
//!   every probe chain ends in an `Empty` slot.
//! - Keys compare by exact `==`.
//!
//! Deletion
//! - Removed slots become tombstones. Lookups walk past them and inserts
//!   reuse them. When tombstones alone push the fill over the threshold, the
//!   table is rehashed at its current size.
//!
//! Iteration bounds
//! - The table tracks the first and last used slot. Iteration, removal and
//!   min/max scans only touch that span. Iteration order is slot order.
//!
//! Allocation failure
//! - Every allocating operation has a `try_*` form returning `TableError`.
//!   New storage is allocated before the table is touched, so a failure
//!   leaves the table unchanged. The plain forms panic like std collections.
//!
//! Logging
//! - Rehashes, tombstone purges, merge pre-growth and copy reallocation are
//!   reported through `tracing` at `debug`/`trace` level.

mod error;
mod float_dict;
#[cfg(test)]
mod float_dict_proptest;
pub mod hash;
pub mod pair_set;
mod probe;

#[cfg(feature = "bench_internal")]
pub mod raw_table;
#[cfg(not(feature = "bench_internal"))]
mod raw_table;

// Public surface
pub use error::{Result, TableError};
pub use float_dict::{Cursor, Dump, FloatDict, IntoIter, Iter, IterMut};
pub use pair_set::PairSet;
pub use raw_table::{GROWTH_FACTOR, MIN_CAPACITY};
