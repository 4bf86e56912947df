//! Errors surfaced by the fallible (`try_*`) table operations.

use std::collections::TryReserveError;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("out of memory allocating {capacity} slots")]
    OutOfMemory {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("capacity overflow: cannot hold {requested} slots")]
    CapacityOverflow { requested: usize },
}

/// Unwraps the result of an allocating operation, panicking the way std
/// collections do when they cannot grow.
#[inline]
#[track_caller]
pub(crate) fn infallible<T>(res: Result<T>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}
