//! Configuration management for procwatch
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! `PROCWATCH_`-prefixed environment variables and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Configuration for the HTTP front door.
    pub server: ServerConfig,
    /// Configuration for the process metrics collector.
    pub collector: CollectorConfig,
    /// Configuration for the internal Prometheus exporter.
    pub metrics: MetricsConfig,
}

/// Configuration for the HTTP front door.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// The address the HTTP server binds to.
    pub listen_address: SocketAddr,
}

/// Configuration for the process metrics collector.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Interval between the two CPU samples taken per request, in milliseconds.
    pub cpu_sample_ms: u64,
}

/// Configuration for the internal Prometheus exporter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether the exporter is started at all.
    pub enabled: bool,
    /// The address the exporter binds to.
    pub listen_address: SocketAddr,
}

impl Config {
    /// Loads the configuration, using the file named by `--config` if given.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            if !path.exists() {
                anyhow::bail!("configuration file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            // e.g. PROCWATCH_SERVER__LISTEN_ADDRESS=127.0.0.1:8080
            .merge(Env::prefixed("PROCWATCH_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig {
                listen_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            },
            collector: CollectorConfig::default(),
            metrics: MetricsConfig {
                enabled: false,
                listen_address: SocketAddr::from(([127, 0, 0, 1], 9090)),
            },
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { cpu_sample_ms: 100 }
    }
}
