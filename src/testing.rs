//! Testing utilities for pipeline aggregations.
//!
//! - [`BucketsBuilder`] builds ordered bucket sequences fluently, including gaps.
//! - [`assert_bucket_metric`] checks a max/min result with a readable failure message.
//!
//! ```
//! use bucketpipe::testing::*;
//! use bucketpipe::{BucketMetricsReducer, MaxBucket, PipelineAggConfig};
//!
//! let buckets = BucketsBuilder::new()
//!     .value("a", 5.0)
//!     .gap("b")
//!     .value("c", 5.0)
//!     .build_agg("histo", "v");
//!
//! let reducer = BucketMetricsReducer::new(MaxBucket, PipelineAggConfig::new("max", "v")).unwrap();
//! assert_bucket_metric(&reducer.reduce(&buckets), 5.0, &["a", "c"]);
//! ```

use crate::buckets::{Bucket, MultiBucketAgg};
use crate::result::BucketMetricValue;

/// Fluent builder for ordered `(key, raw value)` sequences.
#[derive(Clone, Debug, Default)]
pub struct BucketsBuilder {
    buckets: Vec<(String, Option<f64>)>,
}

impl BucketsBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }

    /// A bucket with a value.
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.buckets.push((key.into(), Some(value)));
        self
    }

    /// A bucket without the requested metric.
    #[must_use]
    pub fn gap(mut self, key: impl Into<String>) -> Self {
        self.buckets.push((key.into(), None));
        self
    }

    /// Buckets keyed `prefix0`, `prefix1`, ... with the given values.
    #[must_use]
    pub fn values(mut self, prefix: &str, values: &[f64]) -> Self {
        let start = self.buckets.len();
        for (i, v) in values.iter().enumerate() {
            self.buckets.push((format!("{prefix}{}", start + i), Some(*v)));
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Plain pairs, usable directly as a [`BucketSource`](crate::BucketSource).
    #[must_use]
    pub fn build(self) -> Vec<(String, Option<f64>)> {
        self.buckets
    }

    /// A [`MultiBucketAgg`] whose buckets carry the value under `metric`.
    /// Gaps become buckets without that metric.
    #[must_use]
    pub fn build_agg(self, name: &str, metric: &str) -> MultiBucketAgg {
        let buckets = self
            .buckets
            .into_iter()
            .map(|(key, raw)| {
                let bucket = Bucket::new(key, 1);
                match raw {
                    Some(v) => bucket.with_metric(metric, v),
                    None => bucket,
                }
            })
            .collect();
        MultiBucketAgg::new(name, buckets)
    }
}

/// Assert a max/min result's value (exactly) and winning keys (in order).
///
/// # Panics
///
/// Panics if the value or the keys differ.
pub fn assert_bucket_metric(actual: &BucketMetricValue, value: f64, keys: &[&str]) {
    let same_value = actual.value() == value || (actual.value().is_nan() && value.is_nan());
    assert!(
        same_value,
        "Bucket metric [{}] value mismatch:\n  Expected: {value}\n  Actual: {}\n  Keys: {:?}",
        actual.name(),
        actual.value(),
        actual.keys()
    );
    assert!(
        actual.keys().iter().map(String::as_str).eq(keys.iter().copied()),
        "Bucket metric [{}] keys mismatch:\n  Expected: {keys:?}\n  Actual: {:?}",
        actual.name(),
        actual.keys()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::BucketPath;

    #[test]
    fn values_continue_numbering() {
        let pairs = BucketsBuilder::new().gap("g").values("k", &[1.0, 2.0]).build();
        assert_eq!(
            pairs,
            vec![("g".to_string(), None), ("k1".to_string(), Some(1.0)), ("k2".to_string(), Some(2.0))]
        );
    }

    #[test]
    fn build_agg_leaves_gaps_unresolved() {
        let agg = BucketsBuilder::new().value("a", 1.0).gap("b").build_agg("h", "m");
        let path = BucketPath::new("m");
        let got: Vec<_> = agg.resolve(&path).collect();
        assert_eq!(got, vec![("a", Some(1.0)), ("b", None)]);
    }

    #[test]
    #[should_panic(expected = "keys mismatch")]
    fn assert_bucket_metric_reports_keys() {
        let r = BucketMetricValue::new(
            "m",
            vec!["a".into()],
            1.0,
            std::sync::Arc::new(crate::format::Raw),
            crate::result::Metadata::new(),
        );
        assert_bucket_metric(&r, 1.0, &["b"]);
    }
}
