//! Data-driven inventory content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Item catalogs (data-driven via RON)
//! - Inventory configuration (data-driven via TOML)
//!
//! Content is turned into `inventory-core` types at startup and never changes
//! afterwards. A default data set ships in this crate's `data/` directory.

use std::path::PathBuf;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ItemLoader, LoadResult};

/// Directory holding the content bundled with this crate.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
