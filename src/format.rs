//! Value formatters attached to pipeline aggregation results.
//!
//! Reducers never look at a formatter; they only hand it on to the result so the
//! consumer can render `value_as_string`.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Converts a numeric result into its display string.
pub trait ValueFormatter: Debug + Send + Sync {
    fn format(&self, value: f64) -> String;

    /// Raw formatters add nothing over the numeric value, so renderers omit
    /// `value_as_string` for them.
    fn is_raw(&self) -> bool {
        false
    }
}

/// Shared handle to a formatter.
pub type SharedFormatter = Arc<dyn ValueFormatter>;

/// Plain `f64` display.
#[derive(Clone, Copy, Debug, Default)]
pub struct Raw;

impl ValueFormatter for Raw {
    fn format(&self, value: f64) -> String {
        value.to_string()
    }

    fn is_raw(&self) -> bool {
        true
    }
}

/// Fixed number of fraction digits, taken from a pattern such as `"0.00"`.
#[derive(Clone, Debug)]
pub struct Decimal {
    pattern: String,
    precision: usize,
}

impl Decimal {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let precision = pattern
            .split_once('.')
            .map_or(0, |(_, frac)| frac.chars().filter(|c| matches!(c, '0' | '#')).count());
        Self { pattern, precision }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl ValueFormatter for Decimal {
    fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.precision)
    }
}

/// Serializable choice of formatter, as found in configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSpec {
    #[default]
    Raw,
    Decimal(String),
}

impl FormatSpec {
    #[must_use]
    pub fn build(&self) -> SharedFormatter {
        match self {
            Self::Raw => Arc::new(Raw),
            Self::Decimal(pattern) => Arc::new(Decimal::new(pattern.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_precision_from_pattern() {
        assert_eq!(Decimal::new("0.00").format(3.14159), "3.14");
        assert_eq!(Decimal::new("#.###").format(2.0), "2.000");
        assert_eq!(Decimal::new("0").format(7.6), "8");
    }

    #[test]
    fn format_config_deserializes() {
        let raw: FormatSpec = serde_json::from_str("\"raw\"").unwrap();
        assert!(raw.build().is_raw());
        let dec: FormatSpec = serde_json::from_str(r#"{"decimal":"0.0"}"#).unwrap();
        assert_eq!(dec, FormatSpec::Decimal("0.0".into()));
        assert_eq!(dec.build().format(1.26), "1.3");
    }
}
