//! masked-ids: zero-copy masked views over identifier arrays.
//!
//! Algorithms that repeatedly partition a dataset (random sampling for
//! robust estimation, cross-validation folds, inlier/outlier separation)
//! keep one identifier array and one reusable [`PositionMask`], flip bits
//! between trials, and hand a cheap [`MaskedView`] to downstream code.
//! No identifier data is copied.

pub mod ids;
pub mod mask;
pub mod sampling;
pub mod view;

pub use ids::{ArrayIds, IdArray, IdRange, IdSet, IdsError};
pub use mask::PositionMask;
pub use sampling::{ConfigError, KFold, KFoldConfig, SubsetConfig, SubsetSampler};
pub use view::{MaskedIter, MaskedPositions, MaskedView, ViewError};
