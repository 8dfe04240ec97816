//! Shared helpers for integration tests.

#![allow(dead_code)]

use masked_ids::{IdArray, MaskedView, PositionMask};

/// The five-identifier array used throughout the scenarios.
pub fn letters() -> Vec<char> {
    vec!['a', 'b', 'c', 'd', 'e']
}

/// Build a mask of declared length `len` with the given positions set.
pub fn mask_with_len(len: usize, positions: &[usize]) -> PositionMask {
    let mut mask = PositionMask::with_len(len);
    for &p in positions {
        mask.set(p);
    }
    mask
}

/// Assert that the selected and complement views partition `0..array.len()`.
///
/// Every position must appear in exactly one view, both views must iterate
/// in strictly increasing order, and each view's length must match what it
/// yields.
pub fn assert_partition<A: IdArray + ?Sized>(array: &A, mask: &PositionMask) {
    let n = array.len();
    let selected = MaskedView::selected(array, mask);
    let complement = MaskedView::complement(array, mask);

    assert_eq!(
        selected.len() + complement.len(),
        n,
        "view lengths must sum to the array size"
    );

    let sel: Vec<usize> = selected.positions().collect();
    let comp: Vec<usize> = complement.positions().collect();
    assert_eq!(sel.len(), selected.len());
    assert_eq!(comp.len(), complement.len());
    assert!(sel.windows(2).all(|w| w[0] < w[1]), "selected not increasing");
    assert!(comp.windows(2).all(|w| w[0] < w[1]), "complement not increasing");

    let mut hits = vec![0u8; n];
    for &p in sel.iter().chain(comp.iter()) {
        assert!(p < n, "position {} escaped the array", p);
        hits[p] += 1;
    }
    for (p, &h) in hits.iter().enumerate() {
        assert_eq!(h, 1, "position {} seen {} times", p, h);
    }
}
