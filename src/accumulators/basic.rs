//! Basic bucket accumulators: MaxBucket, MinBucket, SumBucket

use super::{BucketAccumulator, ResultParts};
use crate::result::{BucketMetricValue, SimpleValue};

/// Running extreme plus the keys that reached it, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtremeState {
    value: f64,
    keys: Vec<String>,
}

impl ExtremeState {
    fn starting_at(value: f64) -> Self {
        Self {
            value,
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True until the first bucket is accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `better(candidate, current)` must be a strict comparison.
    fn offer(&mut self, key: &str, value: f64, better: fn(f64, f64) -> bool) {
        if better(value, self.value) {
            self.keys.clear();
            self.keys.push(key.to_string());
            self.value = value;
        } else if same_value(value, self.value) {
            self.keys.push(key.to_string());
        }
    }

    fn absorb(&mut self, other: Self, better: fn(f64, f64) -> bool) {
        if better(other.value, self.value) {
            *self = other;
        } else if same_value(other.value, self.value) {
            self.keys.extend(other.keys);
        }
    }

    fn into_result(self, parts: ResultParts) -> BucketMetricValue {
        BucketMetricValue::new(parts.name, self.keys, self.value, parts.format, parts.metadata)
    }
}

// Ties are exact: no epsilon, and 0.0 / -0.0 are distinct values.
#[inline]
fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

/* ===================== MaxBucket ===================== */

/// Maximum bucket value and the key(s) of the bucket(s) holding it.
///
/// - State: [`ExtremeState`] starting at `-inf` with no keys
/// - Output: [`BucketMetricValue`]
///
/// A strictly greater value discards every key tied so far. An exactly equal
/// value appends its key. Smaller values leave no trace.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxBucket;

impl BucketAccumulator for MaxBucket {
    type State = ExtremeState;
    type Output = BucketMetricValue;

    fn begin(&self) -> ExtremeState {
        ExtremeState::starting_at(f64::NEG_INFINITY)
    }

    fn accumulate(&self, state: &mut ExtremeState, key: &str, value: f64) {
        state.offer(key, value, |a, b| a > b);
    }

    fn merge(&self, state: &mut ExtremeState, other: ExtremeState) {
        state.absorb(other, |a, b| a > b);
    }

    fn finish(&self, state: ExtremeState, parts: ResultParts) -> BucketMetricValue {
        state.into_result(parts)
    }
}

/* ===================== MinBucket ===================== */

/// Minimum bucket value and the key(s) of the bucket(s) holding it.
///
/// Mirror image of [`MaxBucket`]; the empty state is `+inf` with no keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinBucket;

impl BucketAccumulator for MinBucket {
    type State = ExtremeState;
    type Output = BucketMetricValue;

    fn begin(&self) -> ExtremeState {
        ExtremeState::starting_at(f64::INFINITY)
    }

    fn accumulate(&self, state: &mut ExtremeState, key: &str, value: f64) {
        state.offer(key, value, |a, b| a < b);
    }

    fn merge(&self, state: &mut ExtremeState, other: ExtremeState) {
        state.absorb(other, |a, b| a < b);
    }

    fn finish(&self, state: ExtremeState, parts: ResultParts) -> BucketMetricValue {
        state.into_result(parts)
    }
}

/* ===================== SumBucket ===================== */

/// Running sum and number of accepted buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SumState {
    pub sum: f64,
    pub count: u64,
}

/// Sum of all accepted bucket values. Zero when nothing was accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumBucket;

impl BucketAccumulator for SumBucket {
    type State = SumState;
    type Output = SimpleValue;

    fn begin(&self) -> SumState {
        SumState::default()
    }

    fn accumulate(&self, state: &mut SumState, _key: &str, value: f64) {
        state.sum += value;
        state.count += 1;
    }

    fn merge(&self, state: &mut SumState, other: SumState) {
        state.sum += other.sum;
        state.count += other.count;
    }

    fn finish(&self, state: SumState, parts: ResultParts) -> SimpleValue {
        SimpleValue::new(parts.name, state.sum, parts.format, parts.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<A: BucketAccumulator>(acc: &A, input: &[(&str, f64)]) -> A::State {
        let mut state = acc.begin();
        for (k, v) in input {
            acc.accumulate(&mut state, k, *v);
        }
        state
    }

    #[test]
    fn max_resets_ties_on_strict_improvement() {
        let s = run(&MaxBucket, &[("a", 5.0), ("b", 5.0), ("c", 7.0), ("d", 5.0)]);
        assert_eq!(s.value(), 7.0);
        assert_eq!(s.keys(), ["c"]);
    }

    #[test]
    fn max_collects_ties_in_order() {
        let s = run(&MaxBucket, &[("x", 1.0), ("y", 3.0), ("z", 3.0), ("w", 2.0), ("v", 3.0)]);
        assert_eq!(s.keys(), ["y", "z", "v"]);
    }

    #[test]
    fn max_starts_empty() {
        let s = MaxBucket.begin();
        assert!(s.is_empty());
        assert_eq!(s.value(), f64::NEG_INFINITY);
    }

    #[test]
    fn max_degenerate_negative_infinity_ties() {
        let s = run(&MaxBucket, &[("a", f64::NEG_INFINITY)]);
        assert_eq!(s.keys(), ["a"]);
        assert_eq!(s.value(), f64::NEG_INFINITY);
    }

    #[test]
    fn signed_zeros_do_not_tie() {
        let s = run(&MaxBucket, &[("pos", 0.0), ("neg", -0.0)]);
        assert_eq!(s.keys(), ["pos"]);
    }

    #[test]
    fn min_mirrors_max() {
        let s = run(&MinBucket, &[("a", 2.0), ("b", 1.0), ("c", 1.0), ("d", 4.0)]);
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.keys(), ["b", "c"]);
    }

    #[test]
    fn merge_extremes() {
        let mut left = run(&MaxBucket, &[("a", 3.0), ("b", 1.0)]);
        MaxBucket.merge(&mut left, run(&MaxBucket, &[("c", 3.0)]));
        assert_eq!(left.keys(), ["a", "c"]);

        MaxBucket.merge(&mut left, run(&MaxBucket, &[("d", 9.0), ("e", 9.0)]));
        assert_eq!(left.keys(), ["d", "e"]);
        assert_eq!(left.value(), 9.0);

        MaxBucket.merge(&mut left, MaxBucket.begin());
        assert_eq!(left.keys(), ["d", "e"]);
    }

    #[test]
    fn merge_into_empty_takes_other() {
        let mut empty = MinBucket.begin();
        MinBucket.merge(&mut empty, run(&MinBucket, &[("a", -1.0)]));
        assert_eq!(empty.keys(), ["a"]);
        assert_eq!(empty.value(), -1.0);
    }

    #[test]
    fn sum_counts_and_merges() {
        let mut s = run(&SumBucket, &[("a", 1.5), ("b", 2.5)]);
        SumBucket.merge(&mut s, run(&SumBucket, &[("c", -1.0)]));
        assert_eq!(s, SumState { sum: 3.0, count: 3 });
        let out = SumBucket.finish(s, ResultParts::named("total"));
        assert_eq!(out.value(), 3.0);
        assert_eq!(out.name(), "total");
    }
}
