//! Item catalog loader.

use std::path::Path;

use inventory_core::{ItemCatalog, ItemTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTable {
    pub items: Vec<ItemTemplate>,
}

/// Loader for item templates from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load raw item templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse item templates from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemTemplate>> {
        let table: ItemTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item table RON: {}", e))?;

        Ok(table.items)
    }

    /// Load a RON file and build a validated [`ItemCatalog`] from it.
    ///
    /// A table that misses an item id, repeats one, or carries invalid
    /// numbers is rejected.
    pub fn load_catalog(path: &Path) -> LoadResult<ItemCatalog> {
        let templates = Self::load(path)?;
        let catalog = ItemCatalog::from_templates(templates).map_err(|e| {
            anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e)
        })?;
        tracing::info!(path = %path.display(), templates = catalog.len(), "item catalog loaded");
        Ok(catalog)
    }
}
