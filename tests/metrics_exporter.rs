//! Integration test for the internal Prometheus exporter.
//!
//! The recorder is process-global, so this binary holds a single test.

mod helpers;

use anyhow::Result;
use helpers::app::TestAppBuilder;
use std::time::Duration;

#[tokio::test]
async fn exporter_reports_request_counters() -> Result<()> {
    let app = TestAppBuilder::new().with_metrics().start().await?;
    let metrics_addr = app.metrics_addr.expect("metrics must be enabled");

    reqwest::get(app.url("/info")).await?.error_for_status()?;
    reqwest::get(app.url("/metricas")).await?.error_for_status()?;

    let scrape = reqwest::get(format!("http://{}/metrics", metrics_addr))
        .await?
        .text()
        .await?;

    assert!(
        scrape.contains("http_requests_total"),
        "Metrics output should contain 'http_requests_total'. Got:\n{}",
        scrape
    );
    assert!(
        scrape.contains("collection_duration_seconds"),
        "Metrics output should contain 'collection_duration_seconds'. Got:\n{}",
        scrape
    );

    app.shutdown(Duration::from_secs(5)).await
}
