//! Player inventory core: items, catalog, slot store, and deterioration.
//!
//! `inventory-core` holds the rules of the inventory and nothing else: no
//! rendering, input, persistence, or asset loading. Presentation layers issue
//! commands to [`InventoryController`] and react to the [`InventoryEvent`]s it
//! publishes. All slot, weight, and currency mutations flow through
//! [`InventoryStore`], which the controller owns exclusively.
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod item;
pub mod scheduler;
pub mod store;

pub use catalog::{CatalogError, ItemCatalog, default_templates};
pub use config::{ConfigError, InventoryConfig};
pub use controller::InventoryController;
pub use error::{ErrorSeverity, InventoryError};
pub use event::{EventBus, InventoryEvent, Topic, TopicSet, drain};
pub use item::{
    ActionReport, ConsumableData, Deterioration, DeteriorationStep, InstanceId, Item,
    ItemCategory, ItemId, ItemInfo, ItemKind, ItemTemplate, ResourceData, TerminalOutcome,
    UseAction, WeaponData,
};
pub use scheduler::DeteriorationScheduler;
pub use store::{InventoryStore, ReplaceError, StoreEvent};
