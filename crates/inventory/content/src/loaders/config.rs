//! Inventory configuration loader.

use std::path::Path;

use inventory_core::InventoryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for inventory configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate an [`InventoryConfig`] from a TOML file.
    ///
    /// Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> LoadResult<InventoryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InventoryConfig> {
        let config: InventoryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid inventory config: {}", e))?;

        Ok(config)
    }
}
