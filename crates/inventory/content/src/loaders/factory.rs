//! Content factory for building inventory components from data files.

use std::path::{Path, PathBuf};

use inventory_core::{InventoryConfig, InventoryController, ItemCatalog};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all inventory content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load inventory configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<InventoryConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_catalog(&self) -> LoadResult<ItemCatalog> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load_catalog(&path)
    }

    /// Build a ready-to-use controller from both files.
    pub fn build_controller(&self) -> LoadResult<InventoryController> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let controller = InventoryController::new(catalog, &config)?;
        Ok(controller)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
