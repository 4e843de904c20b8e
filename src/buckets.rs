//! Bucket sources: the multi-bucket aggregation output a pipeline aggregation reads.
//!
//! Full bucket-path syntax belongs to the enclosing aggregation framework. Here a
//! [`BucketPath`] simply names a metric on each bucket, with `_count` standing for
//! the bucket's document count.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Path naming the per-bucket metric a pipeline aggregation reduces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketPath(String);

impl BucketPath {
    /// Special path resolving to a bucket's document count.
    pub const COUNT: &'static str = "_count";

    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BucketPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BucketPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One bucket of a multi-bucket aggregation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub doc_count: u64,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl Bucket {
    pub fn new(key: impl Into<String>, doc_count: u64) -> Self {
        Self {
            key: key.into(),
            doc_count,
            metrics: BTreeMap::new(),
        }
    }

    /// Attach a named metric value.
    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Resolve `path` against this bucket. Missing metrics resolve to `None`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn resolve(&self, path: &BucketPath) -> Option<f64> {
        if path.as_str() == BucketPath::COUNT {
            Some(self.doc_count as f64)
        } else {
            self.metrics.get(path.as_str()).copied()
        }
    }
}

/// Ordered buckets produced by a histogram, terms, or similar aggregation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiBucketAgg {
    pub name: String,
    pub buckets: Vec<Bucket>,
}

impl MultiBucketAgg {
    pub fn new(name: impl Into<String>, buckets: Vec<Bucket>) -> Self {
        Self {
            name: name.into(),
            buckets,
        }
    }

    /// The `(key, raw value)` sequence for `path`, in bucket order.
    pub fn resolve<'a>(&'a self, path: &'a BucketPath) -> ResolvedBuckets<'a> {
        ResolvedBuckets {
            buckets: self.buckets.iter(),
            path,
        }
    }
}

/// Iterator returned by [`MultiBucketAgg::resolve`].
pub struct ResolvedBuckets<'a> {
    buckets: std::slice::Iter<'a, Bucket>,
    path: &'a BucketPath,
}

impl<'a> Iterator for ResolvedBuckets<'a> {
    type Item = (&'a str, Option<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        self.buckets
            .next()
            .map(|b| (b.key.as_str(), b.resolve(self.path)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.buckets.size_hint()
    }
}

/// Anything that can hand a reducer an ordered `(key, raw value)` sequence.
///
/// Implemented for [`MultiBucketAgg`] and for plain slices of pairs, which is
/// handy in tests.
pub trait BucketSource {
    fn for_each_bucket(&self, path: &BucketPath, f: &mut dyn FnMut(&str, Option<f64>));
}

impl BucketSource for MultiBucketAgg {
    fn for_each_bucket(&self, path: &BucketPath, f: &mut dyn FnMut(&str, Option<f64>)) {
        for (key, raw) in self.resolve(path) {
            f(key, raw);
        }
    }
}

impl<K: AsRef<str>> BucketSource for [(K, Option<f64>)] {
    fn for_each_bucket(&self, _path: &BucketPath, f: &mut dyn FnMut(&str, Option<f64>)) {
        for (key, raw) in self {
            f(key.as_ref(), *raw);
        }
    }
}

impl<K: AsRef<str>> BucketSource for Vec<(K, Option<f64>)> {
    fn for_each_bucket(&self, path: &BucketPath, f: &mut dyn FnMut(&str, Option<f64>)) {
        self.as_slice().for_each_bucket(path, f);
    }
}
