//! Statistical bucket accumulators: `AvgBucket`, `StatsBucket`

use super::basic::SumState;
use super::{BucketAccumulator, ResultParts};
use crate::result::{SimpleValue, StatsValue};

/* ===================== AvgBucket ===================== */

/// Mean of the accepted bucket values.
///
/// - State: [`SumState`]
/// - Output: [`SimpleValue`], `NaN` when no bucket was accepted
#[derive(Clone, Copy, Debug, Default)]
pub struct AvgBucket;

impl BucketAccumulator for AvgBucket {
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

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, state: SumState, parts: ResultParts) -> SimpleValue {
        let avg = if state.count == 0 {
            f64::NAN
        } else {
            state.sum / state.count as f64
        };
        SimpleValue::new(parts.name, avg, parts.format, parts.metadata)
    }
}

/* ===================== StatsBucket ===================== */

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsState {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

/// Count, sum, min, max (and derived avg) of the accepted bucket values.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsBucket;

impl BucketAccumulator for StatsBucket {
    type State = StatsState;
    type Output = StatsValue;

    fn begin(&self) -> StatsState {
        StatsState::default()
    }

    fn accumulate(&self, state: &mut StatsState, _key: &str, value: f64) {
        state.count += 1;
        state.sum += value;
        state.min = state.min.min(value);
        state.max = state.max.max(value);
    }

    fn merge(&self, state: &mut StatsState, other: StatsState) {
        state.count += other.count;
        state.sum += other.sum;
        state.min = state.min.min(other.min);
        state.max = state.max.max(other.max);
    }

    fn finish(&self, state: StatsState, parts: ResultParts) -> StatsValue {
        StatsValue::new(
            parts.name,
            state.count,
            state.sum,
            state.min,
            state.max,
            parts.format,
            parts.metadata,
        )
    }
}
