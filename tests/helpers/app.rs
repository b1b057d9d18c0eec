#![allow(dead_code)]
//! Test helpers for running the full application instance.

use anyhow::Result;
use procwatch::{app::App, config::Config, core::DistroLookup};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle, time::timeout};

/// A running instance of the application bound to an ephemeral port.
#[derive(Debug)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub metrics_addr: Option<SocketAddr>,
    shutdown_tx: watch::Sender<bool>,
    app_handle: JoinHandle<Result<()>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Shuts down the application and waits for it to terminate.
    /// Fails if the application does not shut down within the specified timeout.
    pub async fn shutdown(self, timeout_duration: Duration) -> Result<()> {
        self.shutdown_tx
            .send(true)
            .expect("Failed to send shutdown signal");

        match timeout(timeout_duration, self.app_handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(anyhow::anyhow!("App failed to shut down within the timeout")),
        }
    }
}

/// A builder for creating `TestApp` instances with specific configurations.
pub struct TestAppBuilder {
    pub config: Config,
    distro_lookup: Option<Arc<dyn DistroLookup>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.collector.cpu_sample_ms = 20;
        Self {
            config,
            distro_lookup: None,
        }
    }

    pub fn with_distro_lookup(mut self, lookup: Arc<dyn DistroLookup>) -> Self {
        self.distro_lookup = Some(lookup);
        self
    }

    pub fn with_metrics(mut self) -> Self {
        self.config.metrics.enabled = true;
        self.config.metrics.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        self
    }

    pub async fn start(self) -> Result<TestApp> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut builder = App::builder(self.config);
        if let Some(lookup) = self.distro_lookup {
            builder = builder.distro_lookup_override(lookup);
        }
        let app = builder.build(shutdown_rx).await?;
        let addr = app.local_addr();
        let metrics_addr = app.metrics_addr();
        let app_handle = tokio::spawn(app.run());

        Ok(TestApp {
            addr,
            metrics_addr,
            shutdown_tx,
            app_handle,
        })
    }
}
