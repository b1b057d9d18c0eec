//! # Process Metrics Collector
//!
//! This module defines the `SystemCollector`, the component that gathers an
//! instantaneous reading of the running process: its pid, resident memory,
//! CPU usage and the name of the operating system it runs on.
//!
//! The collector is built once at startup and shared by every request
//! handler. It holds no per-request state; each call to `collect` creates a
//! fresh `sysinfo::System`, samples the process twice across the configured
//! interval and returns a `ProcessSnapshot`.

pub mod distro;

#[cfg(feature = "test-utils")]
pub mod fake;

pub use distro::OsReleaseLookup;

use crate::config::CollectorConfig;
use crate::core::{DistroLookup, ProcessSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{Pid, System};
use thiserror::Error;
use tracing::{debug, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Errors the collector cannot recover from.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("failed to determine current process id: {0}")]
    Pid(String),

    #[error("process {0} could not be read from the OS")]
    ProcessNotFound(u32),
}

/// Collects process and host metrics for the running service.
pub struct SystemCollector {
    sample_interval: Duration,
    distro: Arc<dyn DistroLookup>,
    // Always `None` outside tests, which point the collector at another pid.
    target: Option<Pid>,
    degraded_logged: AtomicBool,
}

impl std::fmt::Debug for SystemCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemCollector")
            .field("sample_interval", &self.sample_interval)
            .finish_non_exhaustive()
    }
}

impl SystemCollector {
    /// Creates a collector that enriches the OS name from the host's release info.
    pub fn new(config: &CollectorConfig) -> Self {
        Self::with_distro_lookup(config, Arc::new(OsReleaseLookup))
    }

    /// Creates a collector with a custom distribution lookup.
    ///
    /// The sample interval never drops below `sysinfo`'s minimum CPU update
    /// interval; shorter samples always read as 0%.
    pub fn with_distro_lookup(config: &CollectorConfig, distro: Arc<dyn DistroLookup>) -> Self {
        Self {
            sample_interval: Duration::from_millis(config.cpu_sample_ms)
                .max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
            distro,
            target: None,
            degraded_logged: AtomicBool::new(false),
        }
    }

    /// Creates a collector that reads `pid` instead of the current process.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_pid(config: &CollectorConfig, distro: Arc<dyn DistroLookup>, pid: u32) -> Self {
        Self {
            target: Some(Pid::from_u32(pid)),
            ..Self::with_distro_lookup(config, distro)
        }
    }

    /// The effective CPU sampling interval.
    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// Takes a reading of the current process.
    ///
    /// The CPU percentage is measured between two refreshes separated by the
    /// sample interval, so this call suspends for roughly that long. The
    /// suspension is a timer await and does not occupy a runtime thread.
    pub async fn collect(&self) -> Result<ProcessSnapshot, CollectorError> {
        let start = Instant::now();
        let pid = match self.target {
            Some(pid) => pid,
            None => sysinfo::get_current_pid().map_err(|e| CollectorError::Pid(e.to_string()))?,
        };
        let raw_pid = pid.as_u32();

        let mut system = System::new();
        // Process CPU usage is computed against the total CPU time delta, so
        // both refreshes need the global CPU counters too.
        system.refresh_cpu();
        if !system.refresh_process(pid) {
            return Err(CollectorError::ProcessNotFound(raw_pid));
        }
        tokio::time::sleep(self.sample_interval).await;
        system.refresh_cpu();
        if !system.refresh_process(pid) {
            return Err(CollectorError::ProcessNotFound(raw_pid));
        }
        let process = system
            .process(pid)
            .ok_or(CollectorError::ProcessNotFound(raw_pid))?;

        let snapshot = ProcessSnapshot {
            pid: raw_pid,
            memory_mb: bytes_to_mb(process.memory()),
            cpu_percent: normalize_cpu(process.cpu_usage()),
            os_info: self.os_info(),
        };

        metrics::histogram!("collection_duration_seconds").record(start.elapsed().as_secs_f64());
        debug!(?snapshot, "Collected process snapshot");
        Ok(snapshot)
    }

    /// Returns the OS family name, annotated with the distribution when known.
    pub fn os_info(&self) -> String {
        let family = os_family();
        match self.distro.distro_name() {
            Ok(name) if !name.trim().is_empty() => format!("{} ({})", family, name.trim()),
            Ok(_) => {
                self.note_degraded("empty distribution name");
                family
            }
            Err(e) => {
                self.note_degraded(&e.to_string());
                family
            }
        }
    }

    fn note_degraded(&self, reason: &str) {
        if !self.degraded_logged.swap(true, Ordering::Relaxed) {
            warn!(reason, "Distribution lookup unavailable, reporting bare OS name");
        } else {
            debug!(reason, "Distribution lookup unavailable");
        }
    }
}

/// Returns the OS family name in the form "Linux", "Windows" or "Darwin".
pub fn os_family() -> String {
    match std::env::consts::OS {
        "linux" => "Linux".to_string(),
        "windows" => "Windows".to_string(),
        "macos" | "ios" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Unknown".to_string(),
            }
        }
    }
}

fn bytes_to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / BYTES_PER_MB, 2)
}

fn normalize_cpu(usage: f32) -> f64 {
    let usage = f64::from(usage);
    if usage.is_finite() && usage > 0.0 {
        round_to(usage, 1)
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
