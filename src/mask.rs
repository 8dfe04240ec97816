//! Growable position mask.
//!
//! A [`PositionMask`] holds one flag per position of an identifier array.
//! Partitioning drivers flip flags between trials; [`MaskedView`] reads them
//! to decide which identifiers are visible.
//!
//! # Declared Length
//!
//! The mask tracks positions `0..len()` explicitly. Every position at or
//! beyond `len()` is implicitly false. Setting or clearing such a position
//! grows the declared length instead of failing:
//!
//! ```text
//! len() = 3          implicit false
//! [0 1 0] | 0 0 0 0 0 ...
//!
//! after set(5):
//! [0 1 0 0 0 1] | 0 0 ...
//! ```
//!
//! # Performance
//!
//! - `set()`, `clear()`, `contains()`: O(1) amortized
//! - `count_ones()`: O(1), the count is kept current on every mutation
//! - `next_one()`, `next_zero()`: proportional to the number of blocks scanned
//!
//! [`MaskedView`]: crate::view::MaskedView

use std::ops::Range;

use fixedbitset::FixedBitSet;

/// Bits per storage block of the backing [`FixedBitSet`].
const BLOCK_BITS: usize = 32;

// =============================================================================
// PositionMask
// =============================================================================

/// Mutable set of boolean flags indexed by position.
///
/// Backed by a [`FixedBitSet`]. Unused bits in the last block are always
/// zero, so forward scans never report phantom positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMask {
    bits: FixedBitSet,
    /// Number of true flags, kept in sync with `bits`.
    ones: usize,
}

impl PositionMask {
    /// Create an empty mask with declared length 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mask of `len` positions, all false.
    pub fn with_len(len: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(len),
            ones: 0,
        }
    }

    /// Create a mask with the given positions set.
    ///
    /// The declared length is one past the largest position.
    pub fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        let mut mask = Self::new();
        for pos in positions {
            mask.set(pos);
        }
        mask
    }

    /// Declared length: number of explicitly tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the mask tracks no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.len() == 0
    }

    /// Extend the declared length to at least `len`. Never shrinks.
    pub fn grow(&mut self, len: usize) {
        if len > self.bits.len() {
            self.bits.grow(len);
        }
    }

    /// Test a position. Positions beyond the declared length are false.
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.bits.contains(pos)
    }

    /// Set the flag at `pos`, growing the mask if needed.
    #[inline]
    pub fn set(&mut self, pos: usize) {
        self.put(pos, true);
    }

    /// Clear the flag at `pos`, growing the mask if needed.
    #[inline]
    pub fn clear(&mut self, pos: usize) {
        self.put(pos, false);
    }

    /// Set the flag at `pos` to `value` and return its previous value.
    pub fn put(&mut self, pos: usize, value: bool) -> bool {
        self.grow(pos + 1);
        let prev = self.bits.contains(pos);
        self.bits.set(pos, value);
        match (prev, value) {
            (false, true) => self.ones += 1,
            (true, false) => self.ones -= 1,
            _ => {}
        }
        prev
    }

    /// Flip the flag at `pos` and return its new value.
    pub fn toggle(&mut self, pos: usize) -> bool {
        let value = !self.contains(pos);
        self.put(pos, value);
        value
    }

    /// Set every position in `range`, growing the mask if needed.
    pub fn set_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.grow(range.end);
        let before = self.bits.count_ones(range.clone());
        self.bits.insert_range(range.clone());
        self.ones += range.len() - before;
    }

    /// Clear every flag. The declared length is kept.
    pub fn clear_all(&mut self) {
        self.bits.clear();
        self.ones = 0;
    }

    /// Cardinality: number of true flags over the declared length.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Number of true flags in `[0, end)`.
    ///
    /// O(1) when `end >= len()`; otherwise only the clipped tail is counted.
    pub fn count_ones_below(&self, end: usize) -> usize {
        let len = self.bits.len();
        if end >= len {
            self.ones
        } else {
            self.ones - self.bits.count_ones(end..len)
        }
    }

    /// First true position at or after `from`, if any.
    pub fn next_one(&self, from: usize) -> Option<usize> {
        self.scan(from, |block| block)
    }

    /// First false position at or after `from` within the declared length.
    ///
    /// Returns `None` when every position in `from..len()` is true, even
    /// though positions past `len()` are implicitly false.
    pub fn next_zero(&self, from: usize) -> Option<usize> {
        self.scan(from, |block| !block)
    }

    /// Iterate over true positions in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// Block-wise forward scan for the first bit that is set after `view`
    /// is applied to each block.
    #[inline]
    fn scan(&self, from: usize, view: impl Fn(u32) -> u32) -> Option<usize> {
        let len = self.bits.len();
        if from >= len {
            return None;
        }
        let blocks = self.bits.as_slice();
        let mut idx = from / BLOCK_BITS;
        let mut block = view(blocks[idx]) & (!0u32 << (from % BLOCK_BITS));
        loop {
            if block != 0 {
                let pos = idx * BLOCK_BITS + block.trailing_zeros() as usize;
                // Inverted padding bits in the last block look like zeros.
                return (pos < len).then_some(pos);
            }
            idx += 1;
            if idx >= blocks.len() {
                return None;
            }
            block = view(blocks[idx]);
        }
    }
}

impl FromIterator<usize> for PositionMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_positions(iter)
    }
}

impl Extend<usize> for PositionMask {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for pos in iter {
            self.set(pos);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
