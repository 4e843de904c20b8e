//! JSON rendering of pipeline aggregation results.

use anyhow::Result;
use bucketpipe::format::Decimal;
use bucketpipe::testing::*;
use bucketpipe::*;
use serde_json::json;
use std::sync::Arc;

#[test]
fn max_bucket_with_ties_and_metadata() -> Result<()> {
    let cfg = PipelineAggConfig::new("max_monthly_sales", "sales")
        .with_format(FormatSpec::Decimal("0.00".into()))
        .with_meta("dashboard", "revenue");
    let agg = SiblingPipelineAgg::new(BucketMetric::Max, cfg)?;
    let buckets = BucketsBuilder::new()
        .value("2024-01", 550.0)
        .value("2024-02", 60.0)
        .value("2024-03", 550.0)
        .build_agg("sales_per_month", "sales");

    assert_eq!(
        agg.reduce(&buckets).to_json(),
        json!({
            "value": 550.0,
            "value_as_string": "550.00",
            "keys": ["2024-01", "2024-03"],
            "meta": { "dashboard": "revenue" }
        })
    );
    Ok(())
}

#[test]
fn no_accepted_buckets_renders_null_value() -> Result<()> {
    let agg = SiblingPipelineAgg::new(
        BucketMetric::Max,
        PipelineAggConfig::new("max", "sales").with_format(FormatSpec::Decimal("0.0".into())),
    )?;
    let buckets = BucketsBuilder::new().gap("a").gap("b").build();
    assert_eq!(agg.reduce(&buckets).to_json(), json!({ "value": null, "keys": [] }));
    Ok(())
}

#[test]
fn raw_format_omits_value_as_string() -> Result<()> {
    let agg = SiblingPipelineAgg::new(BucketMetric::Sum, PipelineAggConfig::new("total", "v"))?;
    let out = agg.reduce(&vec![("a", Some(1.5)), ("b", Some(2.0))]);
    assert_eq!(out.to_json(), json!({ "value": 3.5 }));
    Ok(())
}

#[test]
fn stats_with_formatter() -> Result<()> {
    let agg = SiblingPipelineAgg::new(
        BucketMetric::Stats,
        PipelineAggConfig::new("s", "v").with_format(FormatSpec::Decimal("0.0".into())),
    )?;
    let out = agg.reduce(&vec![("a", Some(1.0)), ("b", Some(4.0))]);
    assert_eq!(
        out.to_json(),
        json!({
            "count": 2,
            "min": 1.0,
            "max": 4.0,
            "avg": 2.5,
            "sum": 5.0,
            "min_as_string": "1.0",
            "max_as_string": "4.0",
            "avg_as_string": "2.5",
            "sum_as_string": "5.0"
        })
    );
    Ok(())
}

#[test]
fn custom_formatter_is_passed_through() -> Result<()> {
    let reducer = BucketMetricsReducer::new(MaxBucket, PipelineAggConfig::new("m", "v"))?
        .with_formatter(Arc::new(Decimal::new("0.000")));
    let out = reducer.reduce(&vec![("a", Some(2.0))]);
    assert_eq!(out.value_as_string(), "2.000");
    assert_eq!(out.format().format(1.0), "1.000");
    Ok(())
}
