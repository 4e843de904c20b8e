//! # bucketpipe
//!
//! **Sibling pipeline aggregations** for Rust: secondary reductions that run after a
//! multi-bucket aggregation (a date histogram, a terms aggregation, ...) has produced
//! its buckets, and that boil one metric across those buckets down to a single result.
//!
//! ## Key Features
//!
//! - **Max/min bucket** - the extreme value *and* every bucket key that reached it
//! - **Sum, avg and stats bucket** - the rest of the sibling family on the same skeleton
//! - **Gap policies** - skip buckets with missing or non-finite values, or count them as zero
//! - **Owned per-pass state** - a reducer can be shared; every pass owns its own accumulator state
//! - **Parallel passes** - reduce many independent bucket sets on the rayon pool (`parallel` feature)
//! - **Pass metrics** - counters for seen/skipped/accepted buckets (`metrics` feature)
//!
//! ## Quick Start
//!
//! ```
//! use bucketpipe::*;
//!
//! let months = MultiBucketAgg::new("sales_per_month", vec![
//!     Bucket::new("2024-01", 3).with_metric("sales", 550.0),
//!     Bucket::new("2024-02", 0),
//!     Bucket::new("2024-03", 4).with_metric("sales", 375.0),
//! ]);
//!
//! let reducer = BucketMetricsReducer::new(
//!     MaxBucket,
//!     PipelineAggConfig::new("max_monthly_sales", "sales"),
//! )?;
//! let best = reducer.reduce(&months);
//!
//! assert_eq!(best.value(), 550.0);
//! assert_eq!(best.keys(), ["2024-01"]);
//! # Ok::<_, PipelineAggError>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Gap policy
//!
//! A [`GapPolicy`] turns each bucket's raw value (possibly absent, `NaN` or infinite)
//! into a [`GapDecision`]: skip the bucket, or use a finite value.
//!
//! ### Reducer and passes
//!
//! A [`BucketMetricsReducer`] walks the buckets of one pass in the order the source
//! supplies them, applies the gap policy, and feeds accepted `(key, value)` pairs to
//! its accumulator. [`begin_pass`](BucketMetricsReducer::begin_pass) /
//! [`process_bucket`](ReductionPass::process_bucket) /
//! [`end_pass`](ReductionPass::end_pass) expose the pass step by step;
//! [`reduce`](BucketMetricsReducer::reduce) runs it in one go.
//!
//! ### Accumulators
//!
//! The [`accumulators`] module implements [`BucketAccumulator`] for [`MaxBucket`],
//! [`MinBucket`], [`SumBucket`], [`AvgBucket`] and [`StatsBucket`]. Max and min keep
//! every tied key in first-seen order and drop them all on a strict improvement.
//! Ties use exact floating-point equality.
//!
//! ### Empty results
//!
//! A pass that accepts no buckets is not an error: max yields `-inf` with no keys
//! ([`BucketMetricValue::has_value`] is `false`) and renders `"value": null`.
//!
//! ## Module Overview
//!
//! - [`gap_policy`] - gap policies and decisions
//! - [`buckets`] - bucket sources and bucket paths
//! - [`accumulators`] - built-in reductions
//! - [`reducer`] - the reduction pass driver
//! - [`sibling`] - runtime selection of a reduction, batch and parallel passes
//! - [`result`] - result entities and their JSON rendering
//! - [`format`] - value formatters passed through to results
//! - [`config`] - configuration and validation
//! - [`metrics`] - pass counters
//! - [`testing`] - builders and assertions for tests

pub mod accumulators;
pub mod buckets;
pub mod config;
pub mod error;
pub mod format;
pub mod gap_policy;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod reducer;
pub mod result;
pub mod sibling;
pub mod testing;

// General re-exports
pub use accumulators::{
    AvgBucket, BucketAccumulator, MaxBucket, MinBucket, ResultParts, StatsBucket, SumBucket,
};
pub use buckets::{Bucket, BucketPath, BucketSource, MultiBucketAgg};
pub use config::PipelineAggConfig;
pub use error::{PipelineAggError, Result};
pub use format::{FormatSpec, SharedFormatter, ValueFormatter};
pub use gap_policy::{GapDecision, GapPolicy};
pub use reducer::{BucketMetricsReducer, PassStats, ReductionPass};
pub use result::{BucketMetricValue, Metadata, PipelineAggResult, SimpleValue, StatsValue};
pub use sibling::{BucketMetric, SiblingPipelineAgg};

// Gated re-exports
#[cfg(feature = "metrics")]
pub use metrics::MetricsCollector;
