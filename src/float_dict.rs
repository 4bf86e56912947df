//! FloatDict: public dictionary keyed by `f64`, built on `RawTable`.

use crate::error::{infallible, Result};
use crate::raw_table::{self, RawTable, MIN_CAPACITY};
use core::fmt;
use core::iter::FusedIterator;
use tracing::debug;

/// Open-addressing dictionary from `f64` keys to `V` (default `i32`).
///
/// Keys compare by exact `==`: `-0.0` and `0.0` are the same key, and a NaN
/// key can be inserted but never found again.
///
/// Iteration order is slot order, not insertion order.
pub struct FloatDict<V = i32> {
    raw: RawTable<f64, V>,
}

/// Snapshot of one entry and its slot position, produced by
/// [`FloatDict::begin`] and [`FloatDict::advance`].
///
/// A cursor does not borrow the dictionary. After a mutation it may refer to
/// a different entry or to nothing; advancing it is still well defined.
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor<V> {
    index: usize,
    key: f64,
    value: V,
}

impl<V> Cursor<V> {
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn key(&self) -> f64 {
        self.key
    }
    pub fn value(&self) -> &V {
        &self.value
    }
    pub fn into_entry(self) -> (f64, V) {
        (self.key, self.value)
    }
}

impl<V> FloatDict<V> {
    /// Create an empty dictionary at the minimum capacity.
    ///
    /// # Panics
    ///
    /// Panics if the slots cannot be allocated.
    pub fn new() -> Self {
        infallible(Self::try_new())
    }

    pub fn try_new() -> Result<Self> {
        Self::try_with_capacity(MIN_CAPACITY)
    }

    /// Create an empty dictionary with at least `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the slots cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        infallible(Self::try_with_capacity(capacity))
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            raw: RawTable::with_capacity(capacity)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &RawTable<f64, V> {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of slots; always a power of two of at least 8.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Insert or update `key`. Returns the previous value on update.
    ///
    /// # Panics
    ///
    /// Panics if growing the table fails to allocate.
    pub fn insert(&mut self, key: f64, value: V) -> Option<V> {
        infallible(self.try_insert(key, value))
    }

    /// Fallible [`insert`](Self::insert). On error the dictionary is
    /// unchanged and `value` is dropped.
    pub fn try_insert(&mut self, key: f64, value: V) -> Result<Option<V>> {
        self.raw.insert(key, value)
    }

    pub fn get(&self, key: f64) -> Option<&V> {
        self.raw.get(&key).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, key: f64) -> Option<(f64, &V)> {
        self.raw.get(&key).map(|(k, v)| (*k, v))
    }

    pub fn get_mut(&mut self, key: f64) -> Option<&mut V> {
        self.raw.get_mut(&key)
    }

    pub fn contains_key(&self, key: f64) -> bool {
        self.raw.find(&key).is_some()
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: f64) -> Option<V> {
        self.raw.remove(&key).map(|(_, v)| v)
    }

    /// Entry with the smallest key under `f64::total_cmp`.
    pub fn min_entry(&self) -> Option<(f64, &V)> {
        self.iter().min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Entry with the largest key under `f64::total_cmp`.
    pub fn max_entry(&self) -> Option<(f64, &V)> {
        self.iter().max_by(|a, b| a.0.total_cmp(&b.0))
    }

    pub fn min_key(&self) -> Option<f64> {
        self.min_entry().map(|(k, _)| k)
    }

    pub fn max_key(&self) -> Option<f64> {
        self.max_entry().map(|(k, _)| k)
    }

    /// Move every entry of `other` into `self`; `other`'s values win.
    ///
    /// # Panics
    ///
    /// Panics if growing the table fails to allocate.
    pub fn merge_owned(&mut self, other: FloatDict<V>) {
        infallible(self.try_merge_owned(other))
    }

    pub fn try_merge_owned(&mut self, other: FloatDict<V>) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }
        self.pregrow_for(other.len())?;
        for (key, value) in other {
            self.raw.insert(key, value)?;
        }
        Ok(())
    }

    /// Grow ahead of a merge once the combined count reaches two thirds of
    /// the current capacity.
    fn pregrow_for(&mut self, incoming: usize) -> Result<()> {
        let combined = self.len().saturating_add(incoming);
        if combined.saturating_mul(3) >= self.capacity().saturating_mul(2) {
            debug!(
                capacity = self.capacity(),
                combined, "Growing ahead of merge."
            );
            self.raw.resize(combined.saturating_mul(2))?;
        }
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.raw.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Diagnostic rendering: `key: value; ` per live entry in slot order,
    /// keys with three decimals. Not a stable format.
    pub fn dump(&self) -> Dump<'_, V> {
        Dump { dict: self }
    }
}

impl<V: Clone> FloatDict<V> {
    /// Insert a copy of every entry of `other`; `other`'s values win.
    ///
    /// # Panics
    ///
    /// Panics if growing the table fails to allocate.
    pub fn merge(&mut self, other: &FloatDict<V>) {
        infallible(self.try_merge(other))
    }

    pub fn try_merge(&mut self, other: &FloatDict<V>) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }
        self.pregrow_for(other.len())?;
        for (key, value) in other.iter() {
            self.raw.insert(key, value.clone())?;
        }
        Ok(())
    }

    /// Replace the contents of `self` with a slot-exact copy of `source`.
    /// Nested dictionaries stored as values are deep-copied.
    ///
    /// # Panics
    ///
    /// Panics if reallocating fails.
    pub fn copy_from(&mut self, source: &FloatDict<V>) {
        infallible(self.try_copy_from(source))
    }

    pub fn try_copy_from(&mut self, source: &FloatDict<V>) -> Result<()> {
        self.raw.copy_from(&source.raw)
    }

    /// Snapshot of the first entry in slot order; `None` is the end.
    pub fn begin(&self) -> Option<Cursor<V>> {
        self.cursor_from(0)
    }

    /// Snapshot of the entry after `cursor` in slot order; `None` is the end.
    pub fn advance(&self, cursor: &Cursor<V>) -> Option<Cursor<V>> {
        self.cursor_from(cursor.index + 1)
    }

    fn cursor_from(&self, from: usize) -> Option<Cursor<V>> {
        let index = self.raw.next_occupied(from)?;
        let (&key, value) = self.raw.entry_at(index)?;
        Some(Cursor {
            index,
            key,
            value: value.clone(),
        })
    }
}

impl<V> Default for FloatDict<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for FloatDict<V> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy_from(source)
    }
}

impl<V: fmt::Debug> fmt::Debug for FloatDict<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> FromIterator<(f64, V)> for FloatDict<V> {
    fn from_iter<I: IntoIterator<Item = (f64, V)>>(iter: I) -> Self {
        let mut dict = FloatDict::new();
        dict.extend(iter);
        dict
    }
}

impl<V> Extend<(f64, V)> for FloatDict<V> {
    fn extend<I: IntoIterator<Item = (f64, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Display adapter returned by [`FloatDict::dump`].
pub struct Dump<'a, V> {
    dict: &'a FloatDict<V>,
}

impl<V: fmt::Display> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.dict.iter() {
            write!(f, "{key:.3}: {value}; ")?;
        }
        Ok(())
    }
}

/// Iterator over `(key, &value)` in slot order.
pub struct Iter<'a, V> {
    inner: raw_table::Iter<'a, f64, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (f64, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over `(key, &mut value)` in slot order.
pub struct IterMut<'a, V> {
    inner: raw_table::IterMut<'a, f64, V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (f64, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

pub type IntoIter<V> = raw_table::IntoIter<f64, V>;

impl<V> IntoIterator for FloatDict<V> {
    type Item = (f64, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        self.raw.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a FloatDict<V> {
    type Item = (f64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut FloatDict<V> {
    type Item = (f64, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> IterMut<'a, V> {
        self.iter_mut()
    }
}
