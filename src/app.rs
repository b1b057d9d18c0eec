//! The main application logic, decoupled from the entry point.

use crate::{
    collector::SystemCollector,
    config::Config,
    core::DistroLookup,
    internal_metrics::MetricsBuilder,
    render::IndexPage,
    server::{router, AppState},
    task_manager::TaskManager,
};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, instrument, trace};

/// A handle to the running application.
pub struct App {
    task_manager: TaskManager,
    local_addr: SocketAddr,
    metrics_addr: Option<SocketAddr>,
}

impl App {
    /// Creates a new `AppBuilder` to construct an `App`.
    pub fn builder(config: Config) -> AppBuilder {
        AppBuilder::new(config)
    }

    /// The address the HTTP front door is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_addr
    }

    /// Waits for the shutdown signal and then gracefully shuts down all tasks.
    pub async fn run(self) -> Result<()> {
        let mut shutdown_rx = self.task_manager.get_shutdown_rx();
        shutdown_rx.changed().await.ok();
        info!("Shutdown signal received. Waiting for servers to stop...");

        self.task_manager.shutdown().await;
        Ok(())
    }
}

/// Builder for the main application.
///
/// Separates constructing the components from running them and lets tests
/// swap the distribution lookup.
pub struct AppBuilder {
    config: Config,
    distro_lookup_override: Option<Arc<dyn DistroLookup>>,
}

impl AppBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            distro_lookup_override: None,
        }
    }

    /// Overrides the distribution lookup used to enrich the OS name.
    pub fn distro_lookup_override(mut self, lookup: Arc<dyn DistroLookup>) -> Self {
        self.distro_lookup_override = Some(lookup);
        self
    }

    /// Binds the listeners and spawns the servers, returning a runnable `App`.
    #[instrument(skip_all)]
    pub async fn build(self, shutdown_rx: watch::Receiver<bool>) -> Result<App> {
        let config = self.config;
        let task_manager = TaskManager::new(shutdown_rx);

        // =========================================================================
        // 1. Internal metrics
        // =========================================================================
        let metrics_addr = match MetricsBuilder::new(config.metrics.clone())
            .build(task_manager.get_shutdown_rx())
            .await?
        {
            Some((server, addr)) => {
                task_manager.spawn("MetricsServer", server.run());
                Some(addr)
            }
            None => None,
        };

        // =========================================================================
        // 2. Collector and front door
        // =========================================================================
        let collector = match self.distro_lookup_override {
            Some(lookup) => SystemCollector::with_distro_lookup(&config.collector, lookup),
            None => SystemCollector::new(&config.collector),
        };
        let index_page = IndexPage::new().context("failed to compile index template")?;
        let state = AppState::new(Arc::new(collector), Arc::new(index_page));

        let listener = TcpListener::bind(config.server.listen_address)
            .await
            .with_context(|| format!("failed to bind HTTP server to {}", config.server.listen_address))?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on {}", local_addr);

        let mut server_shutdown_rx = task_manager.get_shutdown_rx();
        let app = router(state);
        task_manager.spawn("HttpServer", async move {
            let shutdown = async move {
                let _ = server_shutdown_rx.changed().await;
                trace!("HTTP server received shutdown signal.");
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(App {
            task_manager,
            local_addr,
            metrics_addr,
        })
    }
}
