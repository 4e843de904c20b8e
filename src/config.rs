//! Configuration shared by all sibling pipeline aggregations.
//!
//! ```
//! use bucketpipe::{GapPolicy, PipelineAggConfig};
//!
//! let cfg = PipelineAggConfig::from_json(
//!     r#"{ "name": "best_month", "buckets_path": "sales", "gap_policy": "insert_zero" }"#,
//! )?;
//! assert_eq!(cfg.gap_policy, GapPolicy::InsertZero);
//! # Ok::<_, bucketpipe::PipelineAggError>(())
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::buckets::BucketPath;
use crate::error::{PipelineAggError, Result};
use crate::format::FormatSpec;
use crate::gap_policy::GapPolicy;
use crate::result::Metadata;

/// Name, path, gap policy, format and metadata of one pipeline aggregation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineAggConfig {
    pub name: String,
    pub buckets_path: BucketPath,
    #[serde(default)]
    pub gap_policy: GapPolicy,
    #[serde(default)]
    pub format: FormatSpec,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PipelineAggConfig {
    pub fn new(name: impl Into<String>, buckets_path: impl Into<BucketPath>) -> Self {
        Self {
            name: name.into(),
            buckets_path: buckets_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// # Errors
    ///
    /// Fails on an empty name or an empty buckets path.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PipelineAggError::EmptyName);
        }
        if self.buckets_path.is_empty() {
            return Err(PipelineAggError::EmptyBucketsPath {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineAggError::Json`] for malformed JSON or unknown gap
    /// policies, and the [`validate`](Self::validate) errors otherwise.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not hold a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading pipeline aggregation config {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("parsing pipeline aggregation config {}", path.display()))
    }
}
