//! Error types for configuring pipeline aggregations.
//!
//! Reduction passes themselves never fail. A pass that accepts no buckets is a
//! valid terminal state (see [`BucketMetricValue::has_value`](crate::BucketMetricValue::has_value)),
//! so everything here is about building or parsing a configuration.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PipelineAggError> = std::result::Result<T, E>;

/// Configuration and parsing failures.
#[derive(Debug, Error)]
pub enum PipelineAggError {
    #[error("pipeline aggregation name must not be empty")]
    EmptyName,

    #[error("[buckets_path] must be set for pipeline aggregation [{name}]")]
    EmptyBucketsPath { name: String },

    #[error("unknown gap policy [{0}], expected one of [skip, insert_zero]")]
    UnknownGapPolicy(String),

    #[error("unknown bucket metric [{0}], expected one of [max, min, sum, avg, stats]")]
    UnknownMetric(String),

    #[error("invalid pipeline aggregation config: {0}")]
    Json(#[from] serde_json::Error),
}
