//! Read-only masked views over identifier arrays.
//!
//! A [`MaskedView`] projects an [`IdArray`] through a [`PositionMask`]:
//! with `inverse == false` it shows the identifiers at true positions, with
//! `inverse == true` those at false positions. Nothing is copied; every
//! iteration walks the mask as it is at that moment.
//!
//! # Length Rules
//!
//! For an array of `n` identifiers and a mask of declared length `l`:
//!
//! ```text
//! selected:   count of true flags in [0, min(l, n))
//! complement: n - selected
//! ```
//!
//! Positions in `[l, n)` are implicitly false and belong to the complement.
//! Flags at positions `>= n` are never dereferenced and never counted.
//!
//! # Example
//!
//! ```
//! use masked_ids::{MaskedView, PositionMask};
//!
//! let ids = vec!['a', 'b', 'c', 'd', 'e'];
//! let mask = PositionMask::from_positions([1, 3]);
//!
//! let inliers = MaskedView::selected(&ids, &mask);
//! assert_eq!(inliers.len(), 2);
//! assert_eq!(inliers.to_vec(), vec!['b', 'd']);
//!
//! let outliers = inliers.inverted();
//! assert_eq!(outliers.len(), 3);
//! assert_eq!(outliers.to_vec(), vec!['a', 'c', 'e']);
//! ```

use std::fmt;
use std::iter::FusedIterator;

use crate::ids::{IdArray, IdSet};
use crate::mask::PositionMask;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by view operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("cannot {op} through a masked view; mutate the position mask instead")]
    UnsupportedMutation { op: &'static str },
}

// =============================================================================
// MaskedView
// =============================================================================

/// Borrowed projection of an identifier array through a position mask.
///
/// Cheap to build and `Copy`; create one per partitioning decision. The
/// borrows rule out mutating the mask while the view exists.
pub struct MaskedView<'a, A: ?Sized> {
    array: &'a A,
    mask: &'a PositionMask,
    inverse: bool,
}

impl<A: ?Sized> Clone for MaskedView<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for MaskedView<'_, A> {}

impl<'a, A: IdArray + ?Sized> MaskedView<'a, A> {
    /// Create a view. `inverse` selects false positions instead of true ones.
    ///
    /// The mask length is not checked against the array size.
    pub fn new(array: &'a A, mask: &'a PositionMask, inverse: bool) -> Self {
        Self {
            array,
            mask,
            inverse,
        }
    }

    /// View of the identifiers at true positions.
    pub fn selected(array: &'a A, mask: &'a PositionMask) -> Self {
        Self::new(array, mask, false)
    }

    /// View of the identifiers at false positions.
    pub fn complement(array: &'a A, mask: &'a PositionMask) -> Self {
        Self::new(array, mask, true)
    }

    /// The same array and mask with the opposite polarity.
    pub fn inverted(&self) -> Self {
        Self::new(self.array, self.mask, !self.inverse)
    }

    /// Returns true if this view shows false positions.
    #[inline]
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Underlying identifier array.
    #[inline]
    pub fn array(&self) -> &'a A {
        self.array
    }

    /// Underlying mask.
    #[inline]
    pub fn mask(&self) -> &'a PositionMask {
        self.mask
    }

    /// Number of visible identifiers.
    ///
    /// O(1) unless the mask is longer than the array, in which case the
    /// flags past the array are subtracted out.
    pub fn len(&self) -> usize {
        let n = self.array.len();
        let selected = self.mask.count_ones_below(n);
        if self.inverse {
            n - selected
        } else {
            selected
        }
    }

    /// Returns true if no identifier is visible.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `position` is visible through this view.
    pub fn contains_position(&self, position: usize) -> bool {
        position < self.array.len() && self.mask.contains(position) != self.inverse
    }

    /// Iterate visible identifiers in increasing position order.
    ///
    /// Each call starts a fresh, independent cursor at position 0.
    pub fn iter(&self) -> MaskedIter<'a, A> {
        MaskedIter {
            array: self.array,
            positions: self.positions(),
        }
    }

    /// Iterate visible positions in increasing order.
    pub fn positions(&self) -> MaskedPositions<'a> {
        MaskedPositions {
            mask: self.mask,
            next: 0,
            end: self.array.len(),
            remaining: self.len(),
            inverse: self.inverse,
        }
    }

    /// Collect the visible identifiers.
    pub fn to_vec(&self) -> Vec<A::Id> {
        self.iter().collect()
    }

    /// Always fails: views are read-only.
    pub fn insert(&self, _id: A::Id) -> Result<bool, ViewError> {
        Err(ViewError::UnsupportedMutation { op: "insert" })
    }

    /// Always fails: views are read-only.
    pub fn remove(&self, _id: A::Id) -> Result<bool, ViewError> {
        Err(ViewError::UnsupportedMutation { op: "remove" })
    }

    /// Always fails: views are read-only.
    pub fn clear(&self) -> Result<(), ViewError> {
        Err(ViewError::UnsupportedMutation { op: "clear" })
    }
}

impl<A: IdArray + ?Sized> fmt::Debug for MaskedView<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedView")
            .field("array_len", &self.array.len())
            .field("mask_len", &self.mask.len())
            .field("inverse", &self.inverse)
            .field("len", &self.len())
            .finish()
    }
}

impl<A: IdArray + ?Sized> IdSet for MaskedView<'_, A> {
    type Id = A::Id;

    fn size(&self) -> usize {
        self.len()
    }

    fn for_each_id<F: FnMut(A::Id)>(&self, f: F) {
        self.iter().for_each(f);
    }
}

impl<'a, A: IdArray + ?Sized> IntoIterator for MaskedView<'a, A> {
    type Item = A::Id;
    type IntoIter = MaskedIter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, A: IdArray + ?Sized> IntoIterator for &MaskedView<'a, A> {
    type Item = A::Id;
    type IntoIter = MaskedIter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Cursor over the visible positions of a [`MaskedView`].
#[derive(Debug, Clone)]
pub struct MaskedPositions<'a> {
    mask: &'a PositionMask,
    /// Next position to scan from.
    next: usize,
    /// Array size; scanning never reaches it.
    end: usize,
    /// Positions left to yield. Fixed at creation from the view length.
    remaining: usize,
    inverse: bool,
}

impl Iterator for MaskedPositions<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let found = if self.inverse {
            // Past the declared length every position is false.
            self.mask
                .next_zero(self.next)
                .unwrap_or_else(|| self.next.max(self.mask.len()))
        } else {
            self.mask.next_one(self.next).unwrap_or(self.end)
        };
        if found >= self.end {
            self.remaining = 0;
            return None;
        }
        self.next = found + 1;
        self.remaining -= 1;
        Some(found)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MaskedPositions<'_> {}

impl FusedIterator for MaskedPositions<'_> {}

/// Iterator over the identifiers of a [`MaskedView`].
pub struct MaskedIter<'a, A: ?Sized> {
    array: &'a A,
    positions: MaskedPositions<'a>,
}

impl<A: ?Sized> Clone for MaskedIter<'_, A> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            positions: self.positions.clone(),
        }
    }
}

impl<A: IdArray + ?Sized> Iterator for MaskedIter<'_, A> {
    type Item = A::Id;

    #[inline]
    fn next(&mut self) -> Option<A::Id> {
        self.positions.next().map(|pos| self.array.get(pos))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<A: IdArray + ?Sized> ExactSizeIterator for MaskedIter<'_, A> {}

impl<A: IdArray + ?Sized> FusedIterator for MaskedIter<'_, A> {}

impl<A: IdArray + ?Sized> fmt::Debug for MaskedIter<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedIter")
            .field("positions", &self.positions)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
