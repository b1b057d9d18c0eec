//! Distribution lookups with fixed outcomes, for tests.

use crate::core::DistroLookup;
use anyhow::{anyhow, Result};

/// A lookup that always fails, as on a host without release information.
#[derive(Debug, Clone, Default)]
pub struct FailingDistroLookup;

impl DistroLookup for FailingDistroLookup {
    fn distro_name(&self) -> Result<String> {
        Err(anyhow!("simulated distribution lookup failure"))
    }
}

/// A lookup that always returns the given name.
#[derive(Debug, Clone)]
pub struct FixedDistroLookup(pub String);

impl FixedDistroLookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl DistroLookup for FixedDistroLookup {
    fn distro_name(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
