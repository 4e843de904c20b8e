//! Sibling pipeline aggregations chosen at configuration time.
//!
//! [`BucketMetricsReducer`] is generic over its accumulator. When the kind of
//! reduction is only known at runtime (it came from a request or a config file)
//! use [`SiblingPipelineAgg`], which picks the accumulator from a
//! [`BucketMetric`] tag and returns a [`PipelineAggResult`].
//!
//! ```
//! use bucketpipe::{Bucket, BucketMetric, MultiBucketAgg, PipelineAggConfig, SiblingPipelineAgg};
//!
//! let months = MultiBucketAgg::new("sales_per_month", vec![
//!     Bucket::new("2024-01", 3).with_metric("sales", 550.0),
//!     Bucket::new("2024-02", 2).with_metric("sales", 60.0),
//!     Bucket::new("2024-03", 4).with_metric("sales", 550.0),
//! ]);
//!
//! let agg = SiblingPipelineAgg::new(BucketMetric::Max, PipelineAggConfig::new("max_monthly_sales", "sales"))?;
//! let out = agg.reduce(&months);
//! let best = out.as_bucket_metric().unwrap();
//! assert_eq!(best.value(), 550.0);
//! assert_eq!(best.keys(), ["2024-01", "2024-03"]);
//! # Ok::<_, bucketpipe::PipelineAggError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::accumulators::{AvgBucket, MaxBucket, MinBucket, StatsBucket, SumBucket};
use crate::buckets::{BucketSource, MultiBucketAgg};
use crate::config::PipelineAggConfig;
use crate::error::{PipelineAggError, Result};
#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;
use crate::reducer::BucketMetricsReducer;
use crate::result::PipelineAggResult;

/// The sibling reductions this crate provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketMetric {
    #[serde(rename = "max_bucket")]
    Max,
    #[serde(rename = "min_bucket")]
    Min,
    #[serde(rename = "sum_bucket")]
    Sum,
    #[serde(rename = "avg_bucket")]
    Avg,
    #[serde(rename = "stats_bucket")]
    Stats,
}

impl BucketMetric {
    /// Registered aggregation type name, e.g. `max_bucket`.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Max => "max_bucket",
            Self::Min => "min_bucket",
            Self::Sum => "sum_bucket",
            Self::Avg => "avg_bucket",
            Self::Stats => "stats_bucket",
        }
    }
}

impl fmt::Display for BucketMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for BucketMetric {
    type Err = PipelineAggError;

    /// Accepts both `max` and `max_bucket` forms.
    fn from_str(s: &str) -> Result<Self> {
        match s.strip_suffix("_bucket").unwrap_or(s) {
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "sum" => Ok(Self::Sum),
            "avg" => Ok(Self::Avg),
            "stats" => Ok(Self::Stats),
            _ => Err(PipelineAggError::UnknownMetric(s.to_string())),
        }
    }
}

enum Reducer {
    Max(BucketMetricsReducer<MaxBucket>),
    Min(BucketMetricsReducer<MinBucket>),
    Sum(BucketMetricsReducer<SumBucket>),
    Avg(BucketMetricsReducer<AvgBucket>),
    Stats(BucketMetricsReducer<StatsBucket>),
}

// Apply the same expression to whichever reducer is inside.
macro_rules! with_reducer {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            Reducer::Max($r) => $body,
            Reducer::Min($r) => $body,
            Reducer::Sum($r) => $body,
            Reducer::Avg($r) => $body,
            Reducer::Stats($r) => $body,
        }
    };
}

/// A configured sibling pipeline aggregation of any [`BucketMetric`] kind.
pub struct SiblingPipelineAgg {
    metric: BucketMetric,
    reducer: Reducer,
}

impl SiblingPipelineAgg {
    /// # Errors
    ///
    /// Fails if `config` does not [`validate`](PipelineAggConfig::validate).
    pub fn new(metric: BucketMetric, config: PipelineAggConfig) -> Result<Self> {
        let reducer = match metric {
            BucketMetric::Max => Reducer::Max(BucketMetricsReducer::new(MaxBucket, config)?),
            BucketMetric::Min => Reducer::Min(BucketMetricsReducer::new(MinBucket, config)?),
            BucketMetric::Sum => Reducer::Sum(BucketMetricsReducer::new(SumBucket, config)?),
            BucketMetric::Avg => Reducer::Avg(BucketMetricsReducer::new(AvgBucket, config)?),
            BucketMetric::Stats => Reducer::Stats(BucketMetricsReducer::new(StatsBucket, config)?),
        };
        Ok(Self { metric, reducer })
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(self, metrics: MetricsCollector) -> Self {
        let reducer = match self.reducer {
            Reducer::Max(r) => Reducer::Max(r.with_metrics(metrics)),
            Reducer::Min(r) => Reducer::Min(r.with_metrics(metrics)),
            Reducer::Sum(r) => Reducer::Sum(r.with_metrics(metrics)),
            Reducer::Avg(r) => Reducer::Avg(r.with_metrics(metrics)),
            Reducer::Stats(r) => Reducer::Stats(r.with_metrics(metrics)),
        };
        Self {
            metric: self.metric,
            reducer,
        }
    }

    #[must_use]
    pub fn metric(&self) -> BucketMetric {
        self.metric
    }

    #[must_use]
    pub fn config(&self) -> &PipelineAggConfig {
        with_reducer!(&self.reducer, r => r.config())
    }

    /// One reduction pass over `source`.
    pub fn reduce<S: BucketSource + ?Sized>(&self, source: &S) -> PipelineAggResult {
        with_reducer!(&self.reducer, r => r.reduce(source).into())
    }

    /// One independent pass per input, results in input order.
    #[must_use]
    pub fn reduce_all(&self, aggs: &[MultiBucketAgg]) -> Vec<PipelineAggResult> {
        aggs.iter().map(|agg| self.reduce(agg)).collect()
    }

    /// Like [`reduce_all`](Self::reduce_all), running passes on the rayon pool.
    #[cfg(feature = "parallel")]
    #[must_use]
    pub fn reduce_all_par(&self, aggs: &[MultiBucketAgg]) -> Vec<PipelineAggResult> {
        use rayon::prelude::*;

        aggs.par_iter().map(|agg| self.reduce(agg)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_parse() {
        assert_eq!("max".parse::<BucketMetric>().unwrap(), BucketMetric::Max);
        assert_eq!("stats_bucket".parse::<BucketMetric>().unwrap(), BucketMetric::Stats);
        assert!(matches!(
            "median".parse::<BucketMetric>(),
            Err(PipelineAggError::UnknownMetric(s)) if s == "median"
        ));
        assert_eq!(BucketMetric::Avg.to_string(), "avg_bucket");
        assert_eq!(
            serde_json::from_str::<BucketMetric>("\"min_bucket\"").unwrap(),
            BucketMetric::Min
        );
    }

    #[test]
    fn dispatches_to_matching_result_kind() {
        let input = vec![("a", Some(1.0)), ("b", Some(3.0))];
        let run = |metric| {
            let agg = SiblingPipelineAgg::new(metric, PipelineAggConfig::new("x", "v")).unwrap();
            assert_eq!(agg.metric(), metric);
            agg.reduce(&input)
        };

        assert_eq!(run(BucketMetric::Max).as_bucket_metric().unwrap().keys(), ["b"]);
        assert_eq!(run(BucketMetric::Min).as_bucket_metric().unwrap().keys(), ["a"]);
        assert_eq!(run(BucketMetric::Sum).as_simple().unwrap().value(), 4.0);
        assert_eq!(run(BucketMetric::Avg).as_simple().unwrap().value(), 2.0);
        assert_eq!(run(BucketMetric::Stats).as_stats().unwrap().count(), 2);
    }
}
