//! procwatch - a small HTTP service reporting its own process metrics
//!
//! The library exposes the collector, the HTTP front door and the
//! application shell so the binary and the integration tests share them.

pub mod app;
pub mod cli;
pub mod collector;
pub mod config;
pub mod core;
pub mod internal_metrics;
pub mod render;
pub mod server;
pub mod task_manager;

// Re-export core types for convenience
pub use crate::core::*;
