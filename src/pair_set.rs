//! PairSet: a set of ordered `(f64, f64)` tuples on the same slot engine.

use crate::error::{infallible, Result};
use crate::raw_table::{self, RawTable, MIN_CAPACITY};
use core::fmt;
use core::iter::FusedIterator;

/// Set of `(f64, f64)` pairs. `(a, b)` and `(b, a)` are distinct members.
#[derive(Clone)]
pub struct PairSet {
    raw: RawTable<(f64, f64), ()>,
}

impl PairSet {
    /// # Panics
    ///
    /// Panics if the slots cannot be allocated.
    pub fn new() -> Self {
        infallible(Self::try_new())
    }

    pub fn try_new() -> Result<Self> {
        Ok(Self {
            raw: RawTable::with_capacity(MIN_CAPACITY)?,
        })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Add `(a, b)`. Returns `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if growing the table fails to allocate.
    pub fn insert(&mut self, a: f64, b: f64) -> bool {
        infallible(self.try_insert(a, b))
    }

    pub fn try_insert(&mut self, a: f64, b: f64) -> Result<bool> {
        Ok(self.raw.insert((a, b), ())?.is_none())
    }

    pub fn contains(&self, a: f64, b: f64) -> bool {
        self.raw.find(&(a, b)).is_some()
    }

    /// Whether any member's first component equals `a` or `b`.
    pub fn contains_either(&self, a: f64, b: f64) -> bool {
        self.iter().any(|(first, _)| first == a || first == b)
    }

    pub fn remove(&mut self, a: f64, b: f64) -> bool {
        self.raw.remove(&(a, b)).is_some()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.raw.iter(),
        }
    }
}

impl Default for PairSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<(f64, f64)> for PairSet {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut set = PairSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<(f64, f64)> for PairSet {
    fn extend<I: IntoIterator<Item = (f64, f64)>>(&mut self, iter: I) {
        for (a, b) in iter {
            self.insert(a, b);
        }
    }
}

pub struct Iter<'a> {
    inner: raw_table::Iter<'a, (f64, f64), ()>,
}

impl Iterator for Iter<'_> {
    type Item = (f64, f64);

    #[inline]
    fn next(&mut self) -> Option<(f64, f64)> {
        self.inner.next().map(|(pair, _)| *pair)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PairSet {
    type Item = (f64, f64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
