//! Sampling drivers feeding masked views across repeated trials.

mod common;

use approx::assert_relative_eq;
use rstest::rstest;

use common::assert_partition;
use masked_ids::{KFold, KFoldConfig, MaskedView, PositionMask, SubsetConfig, SubsetSampler};

#[rstest]
#[case(0.25, 40, 10)]
#[case(0.5, 7, 4)]
#[case(1.0, 13, 13)]
#[case(0.125, 3, 1)]
fn subset_trials_have_expected_size(
    #[case] rate: f64,
    #[case] n: usize,
    #[case] expected: usize,
) {
    let ids: Vec<u32> = (0..n as u32).collect();
    let config = SubsetConfig::builder().rate(rate).seed(11).build().unwrap();
    let mut sampler = SubsetSampler::new(config).unwrap();
    let mut mask = PositionMask::new();

    for _ in 0..5 {
        assert_eq!(sampler.sample_into(&mut mask, n), expected);
        let sample = MaskedView::selected(&ids, &mask);
        assert_eq!(sample.len(), expected);
        assert_eq!(sample.inverted().len(), n - expected);
        assert_partition(&ids, &mask);
    }
}

#[test]
fn subset_selection_is_roughly_uniform() {
    let n = 20;
    let trials = 4000;
    let ids: Vec<u32> = (0..n as u32).collect();
    let config = SubsetConfig::builder().rate(0.25).seed(5).build().unwrap();
    let mut sampler = SubsetSampler::new(config).unwrap();
    let mut mask = PositionMask::new();
    let mut counts = vec![0usize; n];

    for _ in 0..trials {
        sampler.sample_into(&mut mask, n);
        for id in MaskedView::selected(&ids, &mask) {
            counts[id as usize] += 1;
        }
    }

    for &c in &counts {
        let freq = c as f64 / trials as f64;
        assert_relative_eq!(freq, 0.25, epsilon = 0.05);
    }
}

#[test]
fn exact_trials_reuse_one_mask() {
    let ids: Vec<u32> = (100..160).collect();
    let mut sampler = SubsetSampler::new(SubsetConfig::default()).unwrap();
    let mut mask = PositionMask::with_len(ids.len());

    for _ in 0..20 {
        sampler.sample_exact_into(&mut mask, ids.len(), 3).unwrap();
        let minimal = MaskedView::selected(&ids, &mask);
        assert_eq!(minimal.len(), 3);
        assert!(minimal.iter().all(|id| (100..160).contains(&id)));
        assert_eq!(minimal.inverted().len(), 57);
    }
}

#[test]
fn kfold_views_cover_each_identifier_once() {
    let ids: Vec<u32> = (0..23).collect();
    let config = KFoldConfig::builder().n_folds(4).seed(9).build().unwrap();
    let folds = KFold::new(ids.len(), &config).unwrap();
    let mut mask = PositionMask::new();
    let mut held_out = Vec::new();

    for fold in 0..folds.n_folds() {
        let size = folds.fold_into(fold, &mut mask).unwrap();
        let test = MaskedView::selected(&ids, &mask);
        let train = MaskedView::complement(&ids, &mask);
        assert_eq!(test.len(), size);
        assert_eq!(train.len(), ids.len() - size);
        assert!(train.iter().all(|id| folds.fold_of(id as usize) != Some(fold)));
        held_out.extend(test);
    }

    held_out.sort_unstable();
    assert_eq!(held_out, ids);
}

#[test]
fn kfold_is_reproducible_by_seed() {
    let config = KFoldConfig::builder().n_folds(3).seed(123).build().unwrap();
    let a = KFold::new(30, &config).unwrap();
    let b = KFold::new(30, &config).unwrap();
    for fold in 0..3 {
        assert_eq!(a.fold_positions(fold), b.fold_positions(fold));
    }
}
