//! Result entities produced at the end of a reduction pass.
//!
//! - [`BucketMetricValue`] -- max/min bucket: winning value plus the winning keys.
//! - [`SimpleValue`] -- a single number (sum, avg).
//! - [`StatsValue`] -- count/min/max/sum/avg over the accepted buckets.
//!
//! Rendering follows the usual search-response shape: a value that does not
//! exist (infinite, or `NaN` for simple values) renders as `null`, and
//! `value_as_string` only appears for non-raw formatters.

use serde_json::{json, Map, Value};

use crate::format::SharedFormatter;

/// Opaque request annotations, passed through untouched.
pub type Metadata = Map<String, Value>;

/// Max/min bucket result: the extreme value and every key that reached it.
#[derive(Clone, Debug)]
pub struct BucketMetricValue {
    name: String,
    keys: Vec<String>,
    value: f64,
    format: SharedFormatter,
    metadata: Metadata,
}

impl BucketMetricValue {
    pub fn new(
        name: impl Into<String>,
        keys: Vec<String>,
        value: f64,
        format: SharedFormatter,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            keys,
            value,
            format,
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Winning keys in traversal order. Empty only if no bucket was accepted.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn format(&self) -> &SharedFormatter {
        &self.format
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// False when the pass accepted no buckets.
    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.value.is_infinite() || !self.keys.is_empty()
    }

    #[must_use]
    pub fn value_as_string(&self) -> String {
        self.format.format(self.value)
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let has_value = !self.value.is_infinite();
        let mut body = Map::new();
        body.insert("value".into(), number_or_null(self.value, has_value));
        if has_value && !self.format.is_raw() {
            body.insert("value_as_string".into(), json!(self.value_as_string()));
        }
        body.insert("keys".into(), json!(self.keys));
        with_meta(body, &self.metadata)
    }
}

/// A single-number result.
#[derive(Clone, Debug)]
pub struct SimpleValue {
    name: String,
    value: f64,
    format: SharedFormatter,
    metadata: Metadata,
}

impl SimpleValue {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        format: SharedFormatter,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            format,
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn value_as_string(&self) -> String {
        self.format.format(self.value)
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let has_value = self.value.is_finite();
        let mut body = Map::new();
        body.insert("value".into(), number_or_null(self.value, has_value));
        if has_value && !self.format.is_raw() {
            body.insert("value_as_string".into(), json!(self.value_as_string()));
        }
        with_meta(body, &self.metadata)
    }
}

/// Summary statistics over the accepted buckets.
#[derive(Clone, Debug)]
pub struct StatsValue {
    name: String,
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    format: SharedFormatter,
    metadata: Metadata,
}

impl StatsValue {
    pub fn new(
        name: impl Into<String>,
        count: u64,
        sum: f64,
        min: f64,
        max: f64,
        format: SharedFormatter,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            count,
            sum,
            min,
            max,
            format,
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// `+inf` when no bucket was accepted.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// `-inf` when no bucket was accepted.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `NaN` when no bucket was accepted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let has_value = self.count != 0;
        let mut body = Map::new();
        body.insert("count".into(), json!(self.count));
        body.insert("min".into(), number_or_null(self.min, has_value));
        body.insert("max".into(), number_or_null(self.max, has_value));
        body.insert("avg".into(), number_or_null(self.avg(), has_value));
        body.insert("sum".into(), json!(self.sum));
        if has_value && !self.format.is_raw() {
            for (field, v) in [("min", self.min), ("max", self.max), ("avg", self.avg()), ("sum", self.sum)] {
                body.insert(format!("{field}_as_string"), json!(self.format.format(v)));
            }
        }
        with_meta(body, &self.metadata)
    }
}

/// Output of any sibling pipeline aggregation.
#[derive(Clone, Debug)]
pub enum PipelineAggResult {
    BucketMetric(BucketMetricValue),
    Simple(SimpleValue),
    Stats(StatsValue),
}

impl PipelineAggResult {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BucketMetric(r) => r.name(),
            Self::Simple(r) => r.name(),
            Self::Stats(r) => r.name(),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::BucketMetric(r) => r.metadata(),
            Self::Simple(r) => r.metadata(),
            Self::Stats(r) => r.metadata(),
        }
    }

    #[must_use]
    pub fn as_bucket_metric(&self) -> Option<&BucketMetricValue> {
        match self {
            Self::BucketMetric(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_simple(&self) -> Option<&SimpleValue> {
        match self {
            Self::Simple(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_stats(&self) -> Option<&StatsValue> {
        match self {
            Self::Stats(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::BucketMetric(r) => r.to_json(),
            Self::Simple(r) => r.to_json(),
            Self::Stats(r) => r.to_json(),
        }
    }
}

impl From<BucketMetricValue> for PipelineAggResult {
    fn from(r: BucketMetricValue) -> Self {
        Self::BucketMetric(r)
    }
}

impl From<SimpleValue> for PipelineAggResult {
    fn from(r: SimpleValue) -> Self {
        Self::Simple(r)
    }
}

impl From<StatsValue> for PipelineAggResult {
    fn from(r: StatsValue) -> Self {
        Self::Stats(r)
    }
}

// serde_json has no representation for non-finite numbers.
fn number_or_null(v: f64, has_value: bool) -> Value {
    if has_value && v.is_finite() {
        json!(v)
    } else {
        Value::Null
    }
}

fn with_meta(mut body: Map<String, Value>, metadata: &Metadata) -> Value {
    if !metadata.is_empty() {
        body.insert("meta".into(), Value::Object(metadata.clone()));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Decimal, Raw};
    use std::sync::Arc;

    #[test]
    fn empty_bucket_metric_renders_null() {
        let r = BucketMetricValue::new("m", vec![], f64::NEG_INFINITY, Arc::new(Raw), Metadata::new());
        assert!(!r.has_value());
        assert_eq!(r.to_json(), json!({ "value": null, "keys": [] }));
    }

    #[test]
    fn formatted_bucket_metric_with_meta() {
        let mut meta = Metadata::new();
        meta.insert("owner".into(), json!("ops"));
        let r = BucketMetricValue::new(
            "m",
            vec!["a".into(), "b".into()],
            7.5,
            Arc::new(Decimal::new("0.00")),
            meta,
        );
        assert!(r.has_value());
        assert_eq!(
            r.to_json(),
            json!({
                "value": 7.5,
                "value_as_string": "7.50",
                "keys": ["a", "b"],
                "meta": { "owner": "ops" }
            })
        );
    }

    #[test]
    fn simple_nan_is_null() {
        let r = SimpleValue::new("avg", f64::NAN, Arc::new(Raw), Metadata::new());
        assert_eq!(r.to_json(), json!({ "value": null }));
    }

    #[test]
    fn empty_stats() {
        let r = StatsValue::new("s", 0, 0.0, f64::INFINITY, f64::NEG_INFINITY, Arc::new(Raw), Metadata::new());
        assert!(r.avg().is_nan());
        assert_eq!(
            r.to_json(),
            json!({ "count": 0, "min": null, "max": null, "avg": null, "sum": 0.0 })
        );
    }
}
