//! The bucket metrics reducer: one pass over sibling buckets.
//!
//! A [`BucketMetricsReducer`] owns the configuration and an accumulator.
//! Each call to [`begin_pass`](BucketMetricsReducer::begin_pass) produces a
//! [`ReductionPass`] that owns its accumulator state outright, so passes never
//! share mutable data and the reducer itself can be shared freely.
//!
//! # Example
//! ```
//! use bucketpipe::{BucketMetricsReducer, GapPolicy, MaxBucket, PipelineAggConfig};
//!
//! let reducer = BucketMetricsReducer::new(
//!     MaxBucket,
//!     PipelineAggConfig::new("peak", "sales").with_gap_policy(GapPolicy::InsertZero),
//! )?;
//!
//! let mut pass = reducer.begin_pass();
//! pass.process_bucket("jan", Some(-3.0));
//! pass.process_bucket("feb", None);
//! pass.process_bucket("mar", Some(-1.0));
//! let peak = pass.end_pass(reducer.config().metadata.clone());
//!
//! assert_eq!(peak.value(), 0.0);
//! assert_eq!(peak.keys(), ["feb"]);
//! # Ok::<_, bucketpipe::PipelineAggError>(())
//! ```

use serde::Serialize;
use tracing::{debug, trace};

use crate::accumulators::{BucketAccumulator, ResultParts};
use crate::buckets::BucketSource;
use crate::config::PipelineAggConfig;
use crate::error::Result;
use crate::format::SharedFormatter;
use crate::gap_policy::GapDecision;
#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;
use crate::result::Metadata;

/// What one pass did with its buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub seen: u64,
    pub skipped: u64,
    pub accepted: u64,
    pub gaps_filled: u64,
}

/// Drives reduction passes for one configured pipeline aggregation.
pub struct BucketMetricsReducer<A: BucketAccumulator> {
    accumulator: A,
    config: PipelineAggConfig,
    format: SharedFormatter,
    #[cfg(feature = "metrics")]
    metrics: Option<MetricsCollector>,
}

impl<A: BucketAccumulator> BucketMetricsReducer<A> {
    /// # Errors
    ///
    /// Fails if `config` does not [`validate`](PipelineAggConfig::validate).
    pub fn new(accumulator: A, config: PipelineAggConfig) -> Result<Self> {
        config.validate()?;
        let format = config.format.build();
        Ok(Self {
            accumulator,
            config,
            format,
            #[cfg(feature = "metrics")]
            metrics: None,
        })
    }

    /// Replace the formatter built from the config.
    #[must_use]
    pub fn with_formatter(mut self, format: SharedFormatter) -> Self {
        self.format = format;
        self
    }

    /// Record per-pass counters into `metrics`.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn config(&self) -> &PipelineAggConfig {
        &self.config
    }

    #[must_use]
    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    /// Start a pass with fresh accumulator state.
    #[must_use]
    pub fn begin_pass(&self) -> ReductionPass<'_, A> {
        ReductionPass {
            reducer: self,
            state: self.accumulator.begin(),
            stats: PassStats::default(),
        }
    }

    /// Run a whole pass over `source` and attach the configured metadata.
    pub fn reduce<S: BucketSource + ?Sized>(&self, source: &S) -> A::Output {
        let mut pass = self.begin_pass();
        source.for_each_bucket(&self.config.buckets_path, &mut |key: &str, raw: Option<f64>| {
            pass.process_bucket(key, raw);
        });
        pass.end_pass(self.config.metadata.clone())
    }
}

/// One in-flight reduction pass. Consumed by [`end_pass`](Self::end_pass).
pub struct ReductionPass<'r, A: BucketAccumulator> {
    reducer: &'r BucketMetricsReducer<A>,
    state: A::State,
    stats: PassStats,
}

impl<A: BucketAccumulator> ReductionPass<'_, A> {
    /// Apply the gap policy to `raw` and feed the result to the accumulator.
    ///
    /// Skipped buckets leave no trace in the state or the output.
    pub fn process_bucket(&mut self, key: &str, raw: Option<f64>) {
        self.stats.seen += 1;
        match self.reducer.config.gap_policy.apply(raw) {
            GapDecision::Skip => {
                self.stats.skipped += 1;
                trace!(agg = %self.reducer.config.name, bucket = key, "skipped gap bucket");
            }
            GapDecision::UseValue(value) => {
                if !raw.is_some_and(f64::is_finite) {
                    self.stats.gaps_filled += 1;
                }
                self.stats.accepted += 1;
                trace!(agg = %self.reducer.config.name, bucket = key, value, "accepted bucket");
                self.reducer
                    .accumulator
                    .accumulate(&mut self.state, key, value);
            }
        }
    }

    /// The accumulator state so far.
    #[must_use]
    pub fn state(&self) -> &A::State {
        &self.state
    }

    #[must_use]
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Close the pass and build its result.
    pub fn end_pass(self, metadata: Metadata) -> A::Output {
        let reducer = self.reducer;
        let name = &reducer.config.name;
        debug!(
            agg = %name,
            seen = self.stats.seen,
            skipped = self.stats.skipped,
            accepted = self.stats.accepted,
            "reduction pass finished"
        );
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &reducer.metrics {
            metrics.record_pass(name, &self.stats);
        }
        let parts = ResultParts::new(name.clone(), reducer.format.clone(), metadata);
        reducer.accumulator.finish(self.state, parts)
    }
}
