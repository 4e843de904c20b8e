//! Counters describing what reduction passes did with their buckets.
//!
//! Attach a [`MetricsCollector`] to a reducer with
//! [`BucketMetricsReducer::with_metrics`](crate::BucketMetricsReducer::with_metrics)
//! and every finished pass adds its [`PassStats`] under
//! `<aggregation name>.<counter>`:
//!
//! - `buckets_seen` -- buckets offered to the pass
//! - `buckets_skipped` -- buckets dropped by the gap policy
//! - `buckets_accepted` -- buckets handed to the accumulator
//! - `gaps_filled` -- accepted buckets whose value was substituted by the gap policy
//!
//! # Example
//!
//! ```
//! use bucketpipe::metrics::{MetricsCollector, PassStats};
//!
//! let metrics = MetricsCollector::new();
//! metrics.record_pass("max_sales", &PassStats { seen: 3, skipped: 1, accepted: 2, gaps_filled: 0 });
//! assert_eq!(metrics.counter("max_sales.buckets_accepted"), Some(2));
//! ```

use serde_json::{json, Value};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use crate::reducer::PassStats;

/// Trait for custom metrics.
pub trait Metric: Send + Sync + Any {
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    fn description(&self) -> Option<&str> {
        None
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Thread-safe metric registry shared between reducers.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<HashMap<String, Box<dyn Metric>>>>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Box<dyn Metric>>> {
        // A panic elsewhere cannot leave a counter half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a custom metric, replacing any metric with the same name.
    pub fn register(&self, metric: Box<dyn Metric>) {
        self.lock().insert(metric.name().to_string(), metric);
    }

    /// Add `value` to the counter `name`, creating it if needed.
    ///
    /// A non-counter metric registered under `name` is replaced.
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut inner = self.lock();
        if let Some(counter) = inner
            .get_mut(name)
            .and_then(|m| m.as_any_mut().downcast_mut::<CounterMetric>())
        {
            counter.count += value;
            return;
        }
        inner.insert(
            name.to_string(),
            Box::new(CounterMetric::with_value(name, value)),
        );
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> Option<u64> {
        let mut inner = self.lock();
        inner
            .get_mut(name)
            .and_then(|m| m.as_any_mut().downcast_mut::<CounterMetric>())
            .map(|c| c.count)
    }

    /// Add one pass's stats to the `<name>.*` counters.
    pub fn record_pass(&self, name: &str, stats: &PassStats) {
        self.increment_counter(&format!("{name}.buckets_seen"), stats.seen);
        self.increment_counter(&format!("{name}.buckets_skipped"), stats.skipped);
        self.increment_counter(&format!("{name}.buckets_accepted"), stats.accepted);
        self.increment_counter(&format!("{name}.gaps_filled"), stats.gaps_filled);
    }

    /// Get a snapshot of all metric names and values.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.lock()
            .iter()
            .map(|(name, metric)| (name.clone(), metric.value()))
            .collect()
    }

    /// All metrics as a JSON object of `{ value, description? }` entries.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.lock();
        let mut out = serde_json::Map::new();
        for (name, metric) in inner.iter() {
            let mut entry = serde_json::Map::new();
            entry.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                entry.insert("description".to_string(), json!(desc));
            }
            out.insert(name.clone(), Value::Object(entry));
        }
        Value::Object(out)
    }
}

/// A simple counter metric.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl CounterMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, 0)
    }

    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
