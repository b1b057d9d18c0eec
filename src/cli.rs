//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. Arguments are parsed at startup and merged on top of the
//! configuration file and environment variables, taking precedence over both.

use clap::Parser;
use figment::{
    providers::Serialized,
    value::{Dict, Map},
    Error, Figment, Metadata, Profile, Provider,
};
use std::net::SocketAddr;
use std::path::PathBuf;

/// A small HTTP service reporting its own process metrics.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address for the HTTP server to listen on.
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<SocketAddr>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// CPU sampling interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub cpu_sample_ms: Option<u64>,

    /// Serve internal Prometheus metrics on this address.
    #[arg(long, value_name = "ADDR")]
    pub metrics_listen: Option<SocketAddr>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut figment = Figment::new();

        if let Some(addr) = self.listen {
            figment = figment.merge(Serialized::default(
                "server.listen_address",
                addr.to_string(),
            ));
        }

        if let Some(level) = &self.log_level {
            figment = figment.merge(Serialized::default("log_level", level.clone()));
        }

        if let Some(ms) = self.cpu_sample_ms {
            figment = figment.merge(Serialized::default("collector.cpu_sample_ms", ms));
        }

        // Giving an address implies the exporter should run.
        if let Some(addr) = self.metrics_listen {
            figment = figment
                .merge(Serialized::default("metrics.enabled", true))
                .merge(Serialized::default(
                    "metrics.listen_address",
                    addr.to_string(),
                ));
        }

        figment.data()
    }
}
