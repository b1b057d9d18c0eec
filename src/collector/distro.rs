//! Distribution name lookup backed by the host's release information.

use crate::core::DistroLookup;
use anyhow::{anyhow, Result};
use sysinfo::System;

/// Reads the distribution name the OS reports (`NAME` in `/etc/os-release`
/// on Linux). Other platforms have no distribution concept and always error.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsReleaseLookup;

impl DistroLookup for OsReleaseLookup {
    fn distro_name(&self) -> Result<String> {
        if !cfg!(target_os = "linux") {
            return Err(anyhow!(
                "distribution lookup is not supported on {}",
                std::env::consts::OS
            ));
        }
        System::name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("OS did not report a distribution name"))
    }
}
