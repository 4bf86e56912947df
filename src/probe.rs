//! Perturbed probe sequence over a power-of-two slot array.
//!
//! The sequence starts at `hash & mask` and steps with
//! `i = 5*i + perturb + 1` while `perturb` is shifted right by
//! [`PERTURB_SHIFT`] after each step. Once `perturb` is exhausted the
//! recurrence is a full-period LCG modulo any power of two `>= 4`, so every
//! slot is visited before a position repeats.

pub const PERTURB_SHIFT: u32 = 5;

/// Steps taken before `perturb` reaches zero for any 64-bit hash, counting
/// the starting position.
pub const PERTURB_ROUNDS: usize = u64::BITS.div_ceil(PERTURB_SHIFT) as usize + 1;

#[derive(Clone, Debug)]
pub struct Probe {
    pos: u64,
    perturb: u64,
    mask: u64,
}

impl Probe {
    /// `capacity` must be a power of two.
    #[inline]
    pub fn new(hash: u64, capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mask = capacity as u64 - 1;
        Self {
            pos: hash & mask,
            perturb: hash,
            mask,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos as usize
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos = (self.pos << 2)
            .wrapping_add(self.pos)
            .wrapping_add(self.perturb)
            .wrapping_add(1)
            & self.mask;
        self.perturb >>= PERTURB_SHIFT;
    }

    /// Number of positions a lookup must examine to be sure it has seen every
    /// slot of a table with `capacity` slots.
    #[inline]
    pub fn exhaustive_len(capacity: usize) -> usize {
        capacity + PERTURB_ROUNDS
    }
}

/// Endless stream of positions; callers bound it with `take`.
impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let pos = self.pos();
        self.advance();
        Some(pos)
    }
}
