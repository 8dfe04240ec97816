//! Identifier arrays.
//!
//! [`IdArray`] is the minimal contract a [`MaskedView`] needs from the
//! collection it projects: a fixed size and random access by position.
//! It is implemented for slices, vectors, fixed arrays and 1-D ndarray
//! arrays, so existing storage can be masked without conversion.
//!
//! [`ArrayIds`] and [`IdRange`] are owned arrays for callers that do not
//! already hold one.
//!
//! [`MaskedView`]: crate::view::MaskedView

use std::collections::HashMap;
use std::hash::Hash;

use ndarray::{ArrayBase, Data, Ix1};

// =============================================================================
// Errors
// =============================================================================

/// Identifier array construction and access errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdsError {
    #[error("duplicate identifier at positions {first} and {second}")]
    DuplicateId { first: usize, second: usize },

    #[error("position {position} out of range for array of {len} identifiers")]
    OutOfRange { position: usize, len: usize },
}

#[cold]
#[inline(never)]
#[track_caller]
fn out_of_range(position: usize, len: usize) -> ! {
    panic!(
        "position {} out of range for array of {} identifiers",
        position, len
    )
}

// =============================================================================
// IdArray
// =============================================================================

/// Ordered, randomly indexable sequence of unique identifiers.
///
/// Positions must stay stable for as long as any view borrows the array.
/// Implementors are expected to hold unique identifiers; [`ArrayIds::new`]
/// checks this, the blanket implementations trust the caller.
pub trait IdArray {
    /// Identifier type.
    type Id: Copy;

    /// Number of identifiers.
    fn len(&self) -> usize;

    /// Identifier at `position`.
    ///
    /// # Panics
    /// Panics if `position >= len()`.
    fn get(&self, position: usize) -> Self::Id;

    /// Returns true if the array holds no identifiers.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked variant of [`get`](IdArray::get).
    fn try_get(&self, position: usize) -> Result<Self::Id, IdsError> {
        let len = self.len();
        if position < len {
            Ok(self.get(position))
        } else {
            Err(IdsError::OutOfRange { position, len })
        }
    }
}

impl<T: Copy> IdArray for [T] {
    type Id = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> T {
        match <[T]>::get(self, position) {
            Some(id) => *id,
            None => out_of_range(position, <[T]>::len(self)),
        }
    }
}

impl<T: Copy> IdArray for Vec<T> {
    type Id = T;

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> T {
        IdArray::get(self.as_slice(), position)
    }
}

impl<T: Copy, const N: usize> IdArray for [T; N] {
    type Id = T;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> T {
        IdArray::get(self.as_slice(), position)
    }
}

/// Owned arrays and views alike (`Array1`, `ArrayView1`).
impl<S, T> IdArray for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: Copy,
{
    type Id = T;

    #[inline]
    fn len(&self) -> usize {
        ArrayBase::len(self)
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> T {
        match ArrayBase::get(self, position) {
            Some(id) => *id,
            None => out_of_range(position, ArrayBase::len(self)),
        }
    }
}

impl<A: IdArray + ?Sized> IdArray for &A {
    type Id = A::Id;

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> A::Id {
        (**self).get(position)
    }
}

// =============================================================================
// IdSet
// =============================================================================

/// Sized, iterable collection of identifiers.
///
/// This is what downstream estimators consume: they do not care whether
/// the identifiers come from a full array or a masked subset.
pub trait IdSet {
    /// Identifier type.
    type Id: Copy;

    /// Number of identifiers in the set.
    fn size(&self) -> usize;

    /// Visit every identifier in position order.
    fn for_each_id<F: FnMut(Self::Id)>(&self, f: F);
}

// =============================================================================
// ArrayIds
// =============================================================================

/// Owned identifier array with a uniqueness check at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayIds<T> {
    ids: Vec<T>,
}

impl<T: Copy + Eq + Hash> ArrayIds<T> {
    /// Wrap `ids`, rejecting duplicates.
    pub fn new(ids: Vec<T>) -> Result<Self, IdsError> {
        let mut seen: HashMap<T, usize> = HashMap::with_capacity(ids.len());
        for (pos, &id) in ids.iter().enumerate() {
            if let Some(&first) = seen.get(&id) {
                return Err(IdsError::DuplicateId { first, second: pos });
            }
            seen.insert(id, pos);
        }
        Ok(Self { ids })
    }
}

impl<T: Copy> ArrayIds<T> {
    /// Wrap `ids` without checking uniqueness.
    pub fn new_unchecked(ids: Vec<T>) -> Self {
        Self { ids }
    }

    /// Identifiers as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.ids
    }

    /// Consume the wrapper and return the identifiers.
    pub fn into_inner(self) -> Vec<T> {
        self.ids
    }
}

impl<T: Copy> IdArray for ArrayIds<T> {
    type Id = T;

    #[inline]
    fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> T {
        IdArray::get(self.ids.as_slice(), position)
    }
}

impl<T: Copy> IdSet for ArrayIds<T> {
    type Id = T;

    fn size(&self) -> usize {
        self.ids.len()
    }

    fn for_each_id<F: FnMut(T)>(&self, f: F) {
        self.ids.iter().copied().for_each(f);
    }
}

// =============================================================================
// IdRange
// =============================================================================

/// Contiguous range of integer identifiers: position `p` holds `start + p`.
///
/// Stores nothing per position, which suits databases that hand out
/// sequential identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    start: u32,
    len: usize,
}

impl IdRange {
    /// Create a range of `len` identifiers starting at `start`.
    ///
    /// # Panics
    /// Panics if the last identifier would overflow `u32`.
    pub fn new(start: u32, len: usize) -> Self {
        assert!(
            start as u64 + len as u64 <= u32::MAX as u64 + 1,
            "identifier range {}+{} overflows u32",
            start,
            len
        );
        Self { start, len }
    }

    /// First identifier.
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }
}

impl IdArray for IdRange {
    type Id = u32;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[track_caller]
    fn get(&self, position: usize) -> u32 {
        if position >= self.len {
            out_of_range(position, self.len);
        }
        self.start + position as u32
    }
}

impl IdSet for IdRange {
    type Id = u32;

    fn size(&self) -> usize {
        self.len
    }

    fn for_each_id<F: FnMut(u32)>(&self, mut f: F) {
        for pos in 0..self.len {
            f(self.start + pos as u32);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
