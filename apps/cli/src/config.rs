//! Destination configuration file.
//!
//! TOML, one table per destination:
//!
//! ```toml
//! [[destinations]]
//! name = "primary"
//! baseUrl = "https://blobs.example.com"
//!
//! [[destinations]]
//! name = "mirror"
//! baseUrl = "https://mirror.example.net"
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use blobcast_core::Destination;
use serde::Deserialize;

/// The configured destination list.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationsConfig {
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

impl DestinationsConfig {
    /// Loads and validates the config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for dest in &self.destinations {
            anyhow::ensure!(!dest.name.is_empty(), "destination with empty name");
            anyhow::ensure!(
                seen.insert(&dest.name),
                "duplicate destination name: {}",
                dest.name
            );
        }
        Ok(())
    }
}
