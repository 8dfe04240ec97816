//! Partitioning drivers that write trials into a [`PositionMask`].
//!
//! Robust estimators and model-selection loops repeatedly split a dataset:
//! a random subset per RANSAC trial, one held-out fold per cross-validation
//! round. These drivers mutate a caller-owned mask in place so that a fresh
//! [`MaskedView`] can be built for every trial without allocating.
//!
//! # Available Drivers
//!
//! - [`SubsetSampler`]: random subset without replacement, by rate or exact size
//! - [`KFold`]: balanced assignment of positions to `k` folds
//!
//! # Usage
//!
//! ```
//! use masked_ids::{MaskedView, PositionMask};
//! use masked_ids::sampling::{SubsetConfig, SubsetSampler};
//!
//! let ids: Vec<u32> = (0..100).collect();
//! let mut mask = PositionMask::new();
//! let config = SubsetConfig::builder().rate(0.25).build().unwrap();
//! let mut sampler = SubsetSampler::new(config).unwrap();
//!
//! for _trial in 0..3 {
//!     sampler.sample_into(&mut mask, ids.len());
//!     let sample = MaskedView::selected(&ids, &mask);
//!     assert_eq!(sample.len(), 25);
//! }
//! ```
//!
//! [`MaskedView`]: crate::view::MaskedView

use bon::Builder;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mask::PositionMask;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors raised when configuring or driving a sampler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("rate must be in (0, 1], got {0}")]
    InvalidRate(f64),

    #[error("n_folds must be at least 2, got {0}")]
    TooFewFolds(usize),

    #[error("cannot split {n_positions} positions into {n_folds} folds")]
    TooFewPositions { n_positions: usize, n_folds: usize },

    #[error("cannot draw {requested} distinct positions out of {n_positions}")]
    SampleTooLarge { requested: usize, n_positions: usize },

    #[error("fold {fold} out of range for {n_folds} folds")]
    FoldOutOfRange { fold: usize, n_folds: usize },
}

// =============================================================================
// SubsetConfig
// =============================================================================

/// Configuration for [`SubsetSampler`].
///
/// # Example
///
/// ```
/// use masked_ids::sampling::SubsetConfig;
///
/// let config = SubsetConfig::builder().rate(0.5).seed(7).build().unwrap();
/// assert_eq!(config.seed, 7);
///
/// assert!(SubsetConfig::builder().rate(0.0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SubsetConfig {
    /// Fraction of positions to select, in (0, 1]. Default: 1.0.
    #[builder(default = 1.0)]
    pub rate: f64,

    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,
}

impl<S: subset_config_builder::IsComplete> SubsetConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] if `rate` is outside (0, 1].
    pub fn build(self) -> Result<SubsetConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl SubsetConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rate > 0.0 && self.rate <= 1.0) {
            return Err(ConfigError::InvalidRate(self.rate));
        }
        Ok(())
    }
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            seed: 42,
        }
    }
}

// =============================================================================
// SubsetSampler
// =============================================================================

/// Random subset sampler without replacement.
///
/// Owns its RNG, so consecutive trials differ while the whole sequence is
/// reproducible from the seed. Each trial overwrites the mask.
#[derive(Debug, Clone)]
pub struct SubsetSampler {
    config: SubsetConfig,
    rng: Xoshiro256PlusPlus,
}

impl SubsetSampler {
    /// Create a sampler, validating the configuration.
    ///
    /// Configs can bypass the builder (public fields, deserialization),
    /// so the rate is checked again here.
    pub fn new(config: SubsetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// Sampler configuration.
    #[inline]
    pub fn config(&self) -> &SubsetConfig {
        &self.config
    }

    /// Number of positions a rate-based trial selects out of `n_positions`.
    ///
    /// `ceil(n * rate)`, at least 1 for a non-empty array. Computed in `f64`,
    /// exact for any `n` below 2^53.
    pub fn subset_len(&self, n_positions: usize) -> usize {
        if n_positions == 0 {
            return 0;
        }
        if self.config.rate >= 1.0 {
            return n_positions;
        }
        ((n_positions as f64 * self.config.rate).ceil() as usize).clamp(1, n_positions)
    }

    /// Draw a rate-based subset of `0..n_positions` into `mask`.
    ///
    /// Returns the number of selected positions.
    pub fn sample_into(&mut self, mask: &mut PositionMask, n_positions: usize) -> usize {
        let k = self.subset_len(n_positions);
        self.fill(mask, n_positions, k);
        debug!(n_positions, selected = k, "sampled random subset");
        k
    }

    /// Draw exactly `k` positions of `0..n_positions` into `mask`.
    ///
    /// Minimal-sample estimators (RANSAC) use this with `k` equal to the
    /// number of points that determine a model.
    pub fn sample_exact_into(
        &mut self,
        mask: &mut PositionMask,
        n_positions: usize,
        k: usize,
    ) -> Result<usize, ConfigError> {
        if k > n_positions {
            return Err(ConfigError::SampleTooLarge {
                requested: k,
                n_positions,
            });
        }
        self.fill(mask, n_positions, k);
        debug!(n_positions, selected = k, "sampled exact subset");
        Ok(k)
    }

    /// Reset `mask` to `n_positions` false flags and set `k` random ones.
    fn fill(&mut self, mask: &mut PositionMask, n_positions: usize, k: usize) {
        mask.clear_all();
        mask.grow(n_positions);

        if k == n_positions {
            mask.set_range(0..n_positions);
            return;
        }

        // Floyd's algorithm: k draws, using the mask itself as the seen-set.
        for j in (n_positions - k)..n_positions {
            let t = self.rng.gen_range(0..=j);
            if mask.contains(t) {
                mask.set(j);
            } else {
                mask.set(t);
            }
        }
    }
}

// =============================================================================
// KFoldConfig
// =============================================================================

/// Configuration for [`KFold`].
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct KFoldConfig {
    /// Number of folds, at least 2. Default: 5.
    #[builder(default = 5)]
    pub n_folds: usize,

    /// Shuffle positions before assigning folds. Default: true.
    ///
    /// Without shuffling, folds are contiguous position ranges.
    #[builder(default = true)]
    pub shuffle: bool,

    /// Random seed used when shuffling. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,
}

impl<S: k_fold_config_builder::IsComplete> KFoldConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooFewFolds`] if `n_folds < 2`.
    pub fn build(self) -> Result<KFoldConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl KFoldConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_folds < 2 {
            return Err(ConfigError::TooFewFolds(self.n_folds));
        }
        Ok(())
    }
}

impl Default for KFoldConfig {
    fn default() -> Self {
        Self {
            n_folds: 5,
            shuffle: true,
            seed: 42,
        }
    }
}

// =============================================================================
// KFold
// =============================================================================

/// Balanced assignment of positions to cross-validation folds.
///
/// Positions are stored grouped by fold, sorted within each fold:
/// ```text
/// positions: [fold 0 ...][fold 1 ...][fold 2 ...]
/// bounds:    [(0,n0),    (n0,n0+n1), (n0+n1,n)]
/// ```
///
/// Writing fold `f` into a mask makes the selected view the held-out fold
/// and the complement view the training part.
#[derive(Debug, Clone)]
pub struct KFold {
    positions: Vec<usize>,
    bounds: Vec<(usize, usize)>,
    /// Fold of each position.
    assignment: Vec<u32>,
}

impl KFold {
    /// Assign `n_positions` positions to folds.
    ///
    /// Fold sizes differ by at most one; the first `n % k` folds get the
    /// extra position.
    pub fn new(n_positions: usize, config: &KFoldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n_folds = config.n_folds;
        if n_positions < n_folds {
            return Err(ConfigError::TooFewPositions {
                n_positions,
                n_folds,
            });
        }

        let mut positions: Vec<usize> = (0..n_positions).collect();
        if config.shuffle {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
            positions.shuffle(&mut rng);
        }

        let base = n_positions / n_folds;
        let extra = n_positions % n_folds;
        let mut bounds = Vec::with_capacity(n_folds);
        let mut assignment = vec![0u32; n_positions];
        let mut start = 0;
        for fold in 0..n_folds {
            let end = start + base + usize::from(fold < extra);
            let members = &mut positions[start..end];
            members.sort_unstable();
            for &pos in members.iter() {
                assignment[pos] = fold as u32;
            }
            bounds.push((start, end));
            start = end;
        }

        debug!(n_positions, n_folds, shuffle = config.shuffle, "assigned folds");
        Ok(Self {
            positions,
            bounds,
            assignment,
        })
    }

    /// Number of folds.
    #[inline]
    pub fn n_folds(&self) -> usize {
        self.bounds.len()
    }

    /// Number of positions assigned.
    #[inline]
    pub fn n_positions(&self) -> usize {
        self.assignment.len()
    }

    /// Positions of `fold` in increasing order.
    pub fn fold_positions(&self, fold: usize) -> Option<&[usize]> {
        self.bounds
            .get(fold)
            .map(|&(start, end)| &self.positions[start..end])
    }

    /// Number of positions in `fold`.
    pub fn fold_len(&self, fold: usize) -> Option<usize> {
        self.bounds.get(fold).map(|&(start, end)| end - start)
    }

    /// Fold a position belongs to.
    pub fn fold_of(&self, position: usize) -> Option<usize> {
        self.assignment.get(position).map(|&f| f as usize)
    }

    /// Reset `mask` and set the positions of `fold`.
    ///
    /// Returns the fold size.
    pub fn fold_into(&self, fold: usize, mask: &mut PositionMask) -> Result<usize, ConfigError> {
        let members = self
            .fold_positions(fold)
            .ok_or(ConfigError::FoldOutOfRange {
                fold,
                n_folds: self.n_folds(),
            })?;
        mask.clear_all();
        mask.grow(self.n_positions());
        for &pos in members {
            mask.set(pos);
        }
        debug!(fold, held_out = members.len(), "selected fold");
        Ok(members.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
