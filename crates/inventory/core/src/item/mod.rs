//! Item model: templates, instances, and their presentation view.
//!
//! This module contains:
//! - [`ItemTemplate`]: immutable catalog entry
//! - [`Item`]: an independent instance generated from a template
//! - [`ItemInfo`]: read-only snapshot handed to presentation listeners

mod action;
mod id;
mod kind;

pub use action::{ActionReport, UseAction};
pub use id::{InstanceId, ItemId};
pub use kind::{
    ConsumableData, Deterioration, DeteriorationStep, ItemCategory, ItemKind, ResourceData,
    TerminalOutcome, WeaponData,
};

/// Immutable catalog entry. Instances are produced with [`ItemTemplate::instantiate`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub id: ItemId,
    pub name: String,
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub market_value: f32,
    /// Asset stem; deteriorable items append their level to it.
    pub asset: String,
    pub kind: ItemKind,
}

impl ItemTemplate {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        weight: f32,
        market_value: f32,
        asset: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            market_value,
            asset: asset.into(),
            kind,
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Deep copy of the template under a fresh identity, at deterioration level 0.
    pub fn instantiate(&self, instance: InstanceId) -> Item {
        let mut kind = self.kind.clone();
        if let Some(deterioration) = kind.deterioration_mut() {
            deterioration.level = 0;
        }

        let mut item = Item {
            instance,
            id: self.id,
            name: self.name.clone(),
            weight: self.weight,
            market_value: self.market_value,
            asset_stem: self.asset.clone(),
            asset: String::new(),
            kind,
        };
        item.refresh_asset();
        item
    }
}

/// A concrete item living in an inventory slot.
///
/// Fields are private so the only mutations are the ones the store and the
/// controller perform; outside the crate an `Item` is read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    instance: InstanceId,
    id: ItemId,
    name: String,
    weight: f32,
    market_value: f32,
    asset_stem: String,
    asset: String,
    kind: ItemKind,
}

impl Item {
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn market_value(&self) -> f32 {
        self.market_value
    }

    /// Current visual-asset identifier (level-dependent for deteriorable items).
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    pub fn is_sellable(&self) -> bool {
        self.category().is_sellable()
    }

    pub fn deterioration(&self) -> Option<&Deterioration> {
        self.kind.deterioration()
    }

    pub fn is_deteriorable(&self) -> bool {
        self.deterioration().is_some()
    }

    pub fn use_action(&self) -> Option<&UseAction> {
        self.kind.use_action()
    }

    pub fn info(&self) -> ItemInfo {
        ItemInfo {
            instance: self.instance,
            id: self.id,
            name: self.name.clone(),
            asset: self.asset.clone(),
            weight: self.weight,
            market_value: self.market_value,
            deterioration_level: self.deterioration().map(|d| d.level),
            dps: self.kind.dps(),
        }
    }

    /// Advances deterioration by one level and re-derives the asset.
    ///
    /// Returns `None` for items without the deterioration capability.
    pub(crate) fn deteriorate(&mut self) -> Option<DeteriorationStep> {
        let step = self.kind.deterioration_mut()?.advance();
        if step != DeteriorationStep::Exhausted {
            self.refresh_asset();
        }
        Some(step)
    }

    /// Lowers market value, never below zero. Returns the new value.
    pub(crate) fn lose_value(&mut self, amount: f32) -> f32 {
        self.market_value = (self.market_value - amount).max(0.0);
        self.market_value
    }

    pub(crate) fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    fn refresh_asset(&mut self) {
        self.asset = match self.kind.deterioration() {
            Some(deterioration) => format!("{}{}", self.asset_stem, deterioration.level),
            None => self.asset_stem.clone(),
        };
    }
}

/// Presentation view of an item (tooltip data).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInfo {
    pub instance: InstanceId,
    pub id: ItemId,
    pub name: String,
    pub asset: String,
    pub weight: f32,
    pub market_value: f32,
    pub deterioration_level: Option<u8>,
    pub dps: Option<f32>,
}
