//! RawTable: open-addressing slot engine shared by `FloatDict` and `PairSet`.
//!
//! Slots are `Empty`, `Tombstone` or `Used`. Lookups walk the probe sequence
//! until they find the key or an `Empty` slot; tombstones are stepped over so
//! keys displaced past a removed entry stay reachable, and insertion reuses
//! the first tombstone it passed.
//!
//! Invariants (checked with `debug_assert!`):
//! - capacity is a power of two and at least [`MIN_CAPACITY`];
//! - `used * 3 <= capacity * 2` and `(used + tombstones) * 3 <= capacity * 2`
//!   after every public operation, so an `Empty` slot always exists and
//!   probing terminates;
//! - `span` is `None` iff `used == 0`, otherwise both ends index used slots.

use crate::error::{Result, TableError};
use crate::hash::TableKey;
use crate::probe::Probe;
use core::iter::FusedIterator;
use core::mem;
use core::ops::Range;
use tracing::{debug, trace};

pub const MIN_CAPACITY: usize = 8;
pub const GROWTH_FACTOR: usize = 4;

/// Load threshold of two thirds, kept in integer arithmetic.
#[inline]
fn over_threshold(filled: usize, capacity: usize) -> bool {
    filled.saturating_mul(3) > capacity.saturating_mul(2)
}

fn capacity_for(requested: usize) -> Result<usize> {
    requested
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(TableError::CapacityOverflow { requested })
}

fn alloc_slots<K, V>(capacity: usize) -> Result<Box<[Slot<K, V>]>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::OutOfMemory { capacity, source })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots.into_boxed_slice())
}

#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Used { key: K, value: V },
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn is_used(&self) -> bool {
        matches!(self, Slot::Used { .. })
    }

    #[inline]
    fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Used { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// Inclusive bounds of the occupied slot range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub first: usize,
    pub last: usize,
}

impl Span {
    #[inline]
    fn at(index: usize) -> Self {
        Span {
            first: index,
            last: index,
        }
    }

    #[inline]
    fn include(self, index: usize) -> Self {
        Span {
            first: self.first.min(index),
            last: self.last.max(index),
        }
    }
}

#[derive(Clone)]
pub struct RawTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    used: usize,
    tombstones: usize,
    span: Option<Span>,
}

impl<K, V> RawTable<K, V> {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[cfg_attr(not(any(test, feature = "bench_internal")), allow(dead_code))]
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[cfg_attr(not(any(test, feature = "bench_internal")), allow(dead_code))]
    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    #[inline]
    fn occupied_range(&self) -> Range<usize> {
        match self.span {
            Some(s) => s.first..s.last + 1,
            None => 0..0,
        }
    }

    /// First used slot at or after `from`. Only the occupied span is scanned.
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        let range = self.occupied_range();
        (from.max(range.start)..range.end).find(|&i| self.slots[i].is_used())
    }

    pub fn entry_at(&self, index: usize) -> Option<(&K, &V)> {
        self.slots.get(index)?.entry()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let range = self.occupied_range();
        Iter {
            slots: self.slots[range].iter(),
            remaining: self.used,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let range = self.occupied_range();
        IterMut {
            slots: self.slots[range].iter_mut(),
            remaining: self.used,
        }
    }

    fn scan_span(&self) -> Option<Span> {
        let first = self.slots.iter().position(|s| s.is_used())?;
        let last = self.slots.iter().rposition(|s| s.is_used())?;
        Some(Span { first, last })
    }

    /// Bookkeeping after the used slot at `index` became a tombstone.
    fn vacate(&mut self, index: usize) {
        self.used -= 1;
        self.tombstones += 1;
        let Some(mut span) = self.span else {
            return;
        };
        if self.used == 0 {
            self.span = None;
            return;
        }
        if index == span.last {
            while !self.slots[span.last].is_used() {
                span.last -= 1;
            }
        }
        if index == span.first {
            while !self.slots[span.first].is_used() {
                span.first += 1;
            }
        }
        self.span = Some(span);
    }
}

impl<K, V> RawTable<K, V>
where
    K: TableKey,
{
    pub fn with_capacity(requested: usize) -> Result<Self> {
        let capacity = capacity_for(requested)?;
        Ok(Self {
            slots: alloc_slots(capacity)?,
            used: 0,
            tombstones: 0,
            span: None,
        })
    }

    /// Lookup probe. `None` once an `Empty` slot ends the chain.
    pub fn find(&self, key: &K) -> Option<usize> {
        if self.used == 0 {
            return None;
        }
        let capacity = self.capacity();
        for i in Probe::new(key.table_hash(), capacity).take(Probe::exhaustive_len(capacity)) {
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Used { key: k, .. } if k == key => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Insertion probe: the slot holding `key`, else the first tombstone on
    /// the chain, else the `Empty` slot that ends it.
    fn find_slot(&self, key: &K, hash: u64) -> usize {
        debug_assert!(self.used + self.tombstones < self.capacity());
        let mut free = None;
        let mut probe = Probe::new(hash, self.capacity());
        loop {
            let i = probe.pos();
            match &self.slots[i] {
                Slot::Empty => return free.unwrap_or(i),
                Slot::Tombstone => {
                    free.get_or_insert(i);
                }
                Slot::Used { key: k, .. } if k == key => return i,
                Slot::Used { .. } => {}
            }
            probe.advance();
        }
    }

    /// Write a new entry into the vacant slot at `index`.
    fn occupy(&mut self, index: usize, key: K, value: V) {
        let prev = mem::replace(&mut self.slots[index], Slot::Used { key, value });
        debug_assert!(!prev.is_used());
        if let Slot::Tombstone = prev {
            self.tombstones -= 1;
        }
        self.used += 1;
        self.span = Some(match self.span {
            Some(span) => span.include(index),
            None => Span::at(index),
        });
    }

    pub fn get(&self, key: &K) -> Option<(&K, &V)> {
        let index = self.find(key)?;
        self.slots[index].entry()
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Used { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Insert or update. Returns the previous value on update.
    ///
    /// Storage for any growth this insert triggers is allocated before the
    /// table is touched, so an error leaves the table as it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let index = self.find_slot(&key, key.table_hash());
        let reclaimed = match &mut self.slots[index] {
            Slot::Used { value: old, .. } => return Ok(Some(mem::replace(old, value))),
            Slot::Tombstone => 1,
            Slot::Empty => 0,
        };

        let capacity = self.capacity();
        let used = self.used + 1;
        let filled = used + self.tombstones - reclaimed;
        let fresh = if over_threshold(used, capacity) {
            Some(alloc_slots(capacity_for(
                capacity.saturating_mul(GROWTH_FACTOR),
            )?)?)
        } else if over_threshold(filled, capacity) {
            trace!(capacity, tombstones = self.tombstones, "Purging tombstones.");
            Some(alloc_slots(capacity)?)
        } else {
            None
        };

        self.occupy(index, key, value);
        if let Some(fresh) = fresh {
            self.rehash_into(fresh);
        }
        Ok(None)
    }

    /// Rebuild into `requested` slots (rounded up to a power of two, never
    /// below [`MIN_CAPACITY`] nor below what the live entries need).
    pub fn resize(&mut self, requested: usize) -> Result<()> {
        let needed = self.used.saturating_mul(3) / 2 + 1;
        let fresh = alloc_slots(capacity_for(requested.max(needed))?)?;
        self.rehash_into(fresh);
        Ok(())
    }

    /// Replay every live entry into `fresh`. Never grows, so never recurses.
    fn rehash_into(&mut self, fresh: Box<[Slot<K, V>]>) {
        let from = self.capacity();
        let live = self.used;
        let purged = self.tombstones;
        let range = self.occupied_range();

        let mut old = mem::replace(&mut self.slots, fresh).into_vec();
        self.used = 0;
        self.tombstones = 0;
        self.span = None;
        debug_assert!(!over_threshold(live, self.capacity()));

        for slot in old.drain(range) {
            if let Slot::Used { key, value } = slot {
                let index = self.find_slot(&key, key.table_hash());
                self.occupy(index, key, value);
            }
        }
        debug_assert_eq!(self.used, live);
        debug!(from, to = self.capacity(), live, purged, "Rehashed table.");
    }

    /// Remove `key`, locating it by scanning the occupied span.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.occupied_range().find(|&i| {
            matches!(&self.slots[i], Slot::Used { key: k, .. } if k == key)
        })?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Used { key, value } => {
                self.vacate(index);
                Some((key, value))
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }
}

impl<K, V> RawTable<K, V>
where
    K: TableKey,
    V: Clone,
{
    /// Replace this table's contents with a slot-for-slot copy of `source`,
    /// tombstones included, reallocating when the capacities differ.
    pub fn copy_from(&mut self, source: &Self) -> Result<()> {
        if source.capacity() != self.capacity() {
            trace!(
                from = self.capacity(),
                to = source.capacity(),
                "Reallocating copy target."
            );
            self.slots = alloc_slots(source.capacity())?;
        }
        self.slots.clone_from_slice(&source.slots);
        self.used = source.used;
        self.tombstones = source.tombstones;
        self.span = self.scan_span();
        debug_assert_eq!(self.span, source.span);
        Ok(())
    }
}

/// Iterator over live entries in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Used { key, value } = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over live entries with mutable values.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Used { key, value } = slot {
                self.remaining -= 1;
                return Some((&*key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over live entries in slot order.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Used { key, value } = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for RawTable<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        let range = self.occupied_range();
        let mut slots = self.slots.into_vec();
        slots.truncate(range.end);
        slots.drain(..range.start);
        IntoIter {
            slots: slots.into_iter(),
            remaining: self.used,
        }
    }
}
