//! Built-in accumulators for sibling pipeline aggregations.
//!
//! Each accumulator implements [`BucketAccumulator`] and is driven by a
//! [`BucketMetricsReducer`](crate::BucketMetricsReducer):
//!
//! - [`MaxBucket`] -- maximum value and every key that reached it.
//! - [`MinBucket`] -- minimum value and every key that reached it.
//! - [`SumBucket`] -- sum of values.
//! - [`AvgBucket`] -- mean of values (`NaN` when nothing was accepted).
//! - [`StatsBucket`] -- count, min, max, sum and avg.
//!
//! The accumulator holds no per-pass data itself. [`begin`](BucketAccumulator::begin)
//! hands out a fresh state which the caller owns for the length of one pass and
//! gives back to [`finish`](BucketAccumulator::finish).
//!
//! # Examples
//! ```
//! use bucketpipe::accumulators::{BucketAccumulator, MaxBucket, ResultParts};
//!
//! let max = MaxBucket;
//! let mut state = max.begin();
//! for (key, value) in [("a", 5.0), ("b", 5.0), ("c", 7.0), ("d", 5.0)] {
//!     max.accumulate(&mut state, key, value);
//! }
//! let out = max.finish(state, ResultParts::named("max_sales"));
//! assert_eq!(out.value(), 7.0);
//! assert_eq!(out.keys(), ["c"]);
//! ```

mod basic;
mod statistical;

pub use basic::{ExtremeState, MaxBucket, MinBucket, SumBucket, SumState};
pub use statistical::{AvgBucket, StatsBucket, StatsState};

use std::sync::Arc;

use crate::format::{Raw, SharedFormatter};
use crate::result::{Metadata, PipelineAggResult};

/// The reduction capability a reducer is generic over.
///
/// `accumulate` is only ever called with finite values in traversal order; gap
/// handling has already happened.
pub trait BucketAccumulator: Send + Sync + 'static {
    /// Per-pass mutable state.
    type State: Send;
    /// Result entity built at the end of a pass.
    type Output: Into<PipelineAggResult>;

    fn begin(&self) -> Self::State;

    fn accumulate(&self, state: &mut Self::State, key: &str, value: f64);

    /// Fold a partial state over a later slice of buckets into `state`.
    fn merge(&self, state: &mut Self::State, other: Self::State);

    fn finish(&self, state: Self::State, parts: ResultParts) -> Self::Output;
}

/// The pass-through pieces every result carries.
#[derive(Clone, Debug)]
pub struct ResultParts {
    pub name: String,
    pub format: SharedFormatter,
    pub metadata: Metadata,
}

impl ResultParts {
    pub fn new(name: impl Into<String>, format: SharedFormatter, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            format,
            metadata,
        }
    }

    /// Raw format, no metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(Raw), Metadata::new())
    }
}
