//! Core domain types and service traits for procwatch
//!
//! This module defines the records produced by the collector and served by
//! the HTTP front door, together with the trait used to look up the OS
//! distribution name.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The static display label attached to every response.
pub const DISPLAY_NAME: &str = "João Otávio Andreotti";

/// An instantaneous reading of the running process, without the display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSnapshot {
    /// OS process id of the running service.
    pub pid: u32,
    /// Resident memory in megabytes, rounded to 2 decimals.
    pub memory_mb: f64,
    /// CPU utilization sampled over a short interval.
    pub cpu_percent: f64,
    /// OS family name, optionally annotated with the distribution name.
    pub os_info: String,
}

impl ProcessSnapshot {
    /// Decorates the snapshot with a display name, producing the served record.
    pub fn with_name(self, name: impl Into<String>) -> SystemInfo {
        SystemInfo {
            pid: self.pid,
            memory_mb: self.memory_mb,
            cpu_percent: self.cpu_percent,
            os_info: self.os_info,
            name: name.into(),
        }
    }
}

/// The flat record rendered by `/` and returned by `/metricas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemInfo {
    pub pid: u32,
    #[serde(rename = "memoria_mb")]
    pub memory_mb: f64,
    pub cpu_percent: f64,
    #[serde(rename = "sistema_operacional")]
    pub os_info: String,
    #[serde(rename = "nome")]
    pub name: String,
}

/// The body returned by `/info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameInfo {
    #[serde(rename = "nome")]
    pub name: String,
}

impl Default for NameInfo {
    fn default() -> Self {
        Self {
            name: DISPLAY_NAME.to_string(),
        }
    }
}

/// A source for the name of the OS distribution (e.g. "Ubuntu").
///
/// Implementations return an error when the capability is unavailable on
/// this host; callers are expected to degrade rather than fail.
pub trait DistroLookup: Send + Sync {
    fn distro_name(&self) -> Result<String>;
}
