//! # Internal Metrics Module
//!
//! Optional Prometheus exposition of the service's own behaviour: how many
//! requests each route served, how often the collector failed, and how long
//! a collection took.
//!
//! ## Components:
//!
//! - **`MetricsBuilder`**: installs the Prometheus recorder, binds the
//!   exporter listener and returns a `MetricsServer` ready to be spawned.
//!
//! - **`MetricsServer`**: (Defined in `server.rs`) An `axum`-based web server
//!   that exposes the `/metrics` endpoint for Prometheus to scrape.
//!
//! When the exporter is disabled no recorder is installed and every
//! `metrics::` macro call in the crate is a no-op.

pub mod server;

pub use server::MetricsServer;

use crate::config::MetricsConfig;
use anyhow::{Context, Result};
use metrics::Unit;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Registers descriptions for every metric the crate records.
pub fn describe_metrics() {
    metrics::describe_counter!("http_requests_total", Unit::Count, "Total number of HTTP requests served, labeled by route.");
    metrics::describe_counter!("collector_failures_total", Unit::Count, "Total number of requests that failed because the process could not be read.");
    metrics::describe_histogram!("collection_duration_seconds", Unit::Seconds, "Time taken to collect a process snapshot, including the CPU sampling wait.");
}

/// Builder for the metrics system.
pub struct MetricsBuilder {
    config: MetricsConfig,
}

impl MetricsBuilder {
    /// Creates a new `MetricsBuilder` with the given configuration.
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Installs the global recorder and prepares the exporter server.
    ///
    /// Returns `Ok(None)` when the exporter is disabled. The recorder can only
    /// be installed once per process, so a second enabled build fails.
    pub async fn build(
        self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<Option<(MetricsServer, SocketAddr)>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.05, 0.1, 0.15, 0.2, 0.25, 0.5, 1.0, 2.5],
            )
            .context("invalid histogram buckets")?
            .build_recorder();
        let handle = recorder.handle();

        // Bind before installing so a port clash leaves the process untouched.
        let listener = TcpListener::bind(self.config.listen_address)
            .await
            .with_context(|| {
                format!(
                    "failed to bind metrics server to {}",
                    self.config.listen_address
                )
            })?;
        let addr = listener.local_addr()?;

        metrics::set_global_recorder(recorder)
            .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;
        describe_metrics();
        info!("Metrics exporter listening on {}", addr);

        Ok(Some((MetricsServer::new(listener, handle, shutdown_rx), addr)))
    }
}
