//! Gap policies: what to do with a bucket whose metric is missing or not finite.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineAggError;

/// How a reducer treats buckets without a usable value.
///
/// A value is a "gap" when the bucket lacks the requested metric altogether, or
/// when the metric is `NaN` or infinite (typically a metric aggregation that saw
/// no documents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Leave gap buckets out of the reduction.
    #[default]
    Skip,
    /// Treat gap buckets as `0.0`.
    InsertZero,
}

/// Per-bucket outcome of applying a [`GapPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GapDecision {
    Skip,
    /// Always finite.
    UseValue(f64),
}

impl GapPolicy {
    /// Decide what a bucket with `raw` contributes.
    ///
    /// ```
    /// use bucketpipe::{GapDecision, GapPolicy};
    ///
    /// assert_eq!(GapPolicy::Skip.apply(None), GapDecision::Skip);
    /// assert_eq!(GapPolicy::InsertZero.apply(Some(f64::NAN)), GapDecision::UseValue(0.0));
    /// assert_eq!(GapPolicy::Skip.apply(Some(3.5)), GapDecision::UseValue(3.5));
    /// ```
    #[inline]
    #[must_use]
    pub fn apply(self, raw: Option<f64>) -> GapDecision {
        match raw {
            Some(v) if v.is_finite() => GapDecision::UseValue(v),
            _ => match self {
                Self::Skip => GapDecision::Skip,
                Self::InsertZero => GapDecision::UseValue(0.0),
            },
        }
    }

    /// The name used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::InsertZero => "insert_zero",
        }
    }
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GapPolicy {
    type Err = PipelineAggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "insert_zero" => Ok(Self::InsertZero),
            other => Err(PipelineAggError::UnknownGapPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_values_pass_through_both_policies() {
        for policy in [GapPolicy::Skip, GapPolicy::InsertZero] {
            assert_eq!(policy.apply(Some(-2.5)), GapDecision::UseValue(-2.5));
            assert_eq!(policy.apply(Some(0.0)), GapDecision::UseValue(0.0));
        }
    }

    #[test]
    fn non_finite_values_are_gaps() {
        for raw in [None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY)] {
            assert_eq!(GapPolicy::Skip.apply(raw), GapDecision::Skip);
            assert_eq!(GapPolicy::InsertZero.apply(raw), GapDecision::UseValue(0.0));
        }
    }

    #[test]
    fn negative_zero_is_kept() {
        match GapPolicy::Skip.apply(Some(-0.0)) {
            GapDecision::UseValue(v) => assert!(v == 0.0 && v.is_sign_negative()),
            GapDecision::Skip => panic!("-0.0 is finite"),
        }
    }

    #[test]
    fn parse_and_display_round_trip() {
        assert_eq!("skip".parse::<GapPolicy>().unwrap(), GapPolicy::Skip);
        assert_eq!("insert_zero".parse::<GapPolicy>().unwrap(), GapPolicy::InsertZero);
        assert_eq!(GapPolicy::InsertZero.to_string(), "insert_zero");
        assert!(matches!(
            "keep".parse::<GapPolicy>(),
            Err(PipelineAggError::UnknownGapPolicy(s)) if s == "keep"
        ));
    }

    #[test]
    fn serde_uses_snake_case() {
        let p: GapPolicy = serde_json::from_str("\"insert_zero\"").unwrap();
        assert_eq!(p, GapPolicy::InsertZero);
        assert_eq!(serde_json::to_string(&GapPolicy::Skip).unwrap(), "\"skip\"");
    }
}
