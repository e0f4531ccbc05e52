//! Item catalog: immutable templates and the factory that clones them.
//!
//! Templates are built once and never handed out mutably. Every call to
//! [`ItemCatalog::generate`] returns a deep copy under a fresh
//! [`InstanceId`], so mutating one instance can never leak into the template
//! or into any other instance.

use std::collections::BTreeMap;

use strum::EnumCount;

use crate::error::{ErrorSeverity, InventoryError};
use crate::item::{
    ConsumableData, Deterioration, InstanceId, Item, ItemId, ItemKind, ItemTemplate,
    ResourceData, UseAction, WeaponData,
};

/// Errors raised while building a catalog or generating from it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("no template registered for item id {0}")]
    UnknownItemId(ItemId),

    #[error("catalog table is missing a template for {0}")]
    MissingTemplate(ItemId),

    #[error("catalog table defines {0} more than once")]
    DuplicateTemplate(ItemId),

    #[error("template {id} is invalid: {reason}")]
    InvalidTemplate { id: ItemId, reason: &'static str },
}

impl InventoryError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownItemId(_) => ErrorSeverity::Validation,
            // Table defects are packaging errors found at startup
            Self::MissingTemplate(_) | Self::DuplicateTemplate(_) | Self::InvalidTemplate { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItemId(_) => "CATALOG_UNKNOWN_ITEM_ID",
            Self::MissingTemplate(_) => "CATALOG_MISSING_TEMPLATE",
            Self::DuplicateTemplate(_) => "CATALOG_DUPLICATE_TEMPLATE",
            Self::InvalidTemplate { .. } => "CATALOG_INVALID_TEMPLATE",
        }
    }
}

/// Template registry and instance factory.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    templates: BTreeMap<ItemId, ItemTemplate>,
}

impl ItemCatalog {
    /// Builds the catalog from the built-in template table.
    ///
    /// Calling this again yields an equal, independent catalog.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table does not cover every [`ItemId`]. That is
    /// a packaging defect and is covered by this module's tests.
    pub fn build() -> Self {
        match Self::from_templates(default_templates()) {
            Ok(catalog) => catalog,
            Err(err) => panic!("built-in item table is defective: {err}"),
        }
    }

    /// Builds a catalog from an external table (e.g. a RON content file).
    ///
    /// Every [`ItemId`] must appear exactly once.
    pub fn from_templates(
        templates: impl IntoIterator<Item = ItemTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut table = BTreeMap::new();

        for template in templates {
            let template = validate_template(template)?;
            let id = template.id;
            if table.insert(id, template).is_some() {
                return Err(CatalogError::DuplicateTemplate(id));
            }
        }

        if let Some(missing) = ItemId::all().find(|id| !table.contains_key(id)) {
            return Err(CatalogError::MissingTemplate(missing));
        }

        tracing::debug!(templates = table.len(), "item catalog built");

        Ok(Self { templates: table })
    }

    /// Returns a fresh, independent instance of the template for `id`.
    ///
    /// Instance ids are unique across every catalog in the process.
    pub fn generate(&self, id: ItemId) -> Result<Item, CatalogError> {
        let template = self
            .templates
            .get(&id)
            .ok_or(CatalogError::UnknownItemId(id))?;

        let instance = InstanceId::next();

        let item = template.instantiate(instance);
        tracing::trace!(%id, %instance, "item generated");
        Ok(item)
    }

    /// Generates trash carrying `source`'s current weight.
    pub fn trash_from(&self, source: &Item) -> Result<Item, CatalogError> {
        let mut trash = self.generate(ItemId::Trash)?;
        trash.set_weight(source.weight());
        Ok(trash)
    }

    pub fn template(&self, id: ItemId) -> Option<&ItemTemplate> {
        self.templates.get(&id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.templates.values()
    }

    /// `(id, asset)` pairs for an "add item" menu, in identifier order.
    pub fn menu(&self) -> Vec<(ItemId, String)> {
        let mut menu = Vec::with_capacity(ItemId::COUNT);
        menu.extend(self.templates.values().map(|template| {
            (template.id, template.instantiate(InstanceId(0)).asset().to_owned())
        }));
        menu
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn validate_template(mut template: ItemTemplate) -> Result<ItemTemplate, CatalogError> {
    let id = template.id;
    let invalid = |reason| CatalogError::InvalidTemplate { id, reason };

    if !template.weight.is_finite() || template.weight < 0.0 {
        return Err(invalid("weight must be a finite non-negative number"));
    }
    if !template.market_value.is_finite() || template.market_value < 0.0 {
        return Err(invalid("market value must be a finite non-negative number"));
    }
    if let Some(deterioration) = template.kind.deterioration() {
        if deterioration.max_level == 0 {
            return Err(invalid("max deterioration level must be at least 1"));
        }
        if !deterioration.interval.is_finite() || deterioration.interval <= 0.0 {
            return Err(invalid("deterioration interval must be positive"));
        }
    }
    if let ItemKind::Resource(data) = &template.kind
        && (!data.value_decrement.is_finite() || data.value_decrement < 0.0)
    {
        return Err(invalid("value decrement must be a finite non-negative number"));
    }

    if template.category().is_worthless() {
        template.market_value = 0.0;
    }

    Ok(template)
}

/// Built-in template table.
pub fn default_templates() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate::new(
            ItemId::Sword,
            "Sword",
            10.0,
            1.0,
            "sword",
            ItemKind::Weapon(WeaponData { dps: 1.0 }),
        ),
        ItemTemplate::new(
            ItemId::Bow,
            "Bow",
            1.0,
            1.0,
            "bow",
            ItemKind::Weapon(WeaponData { dps: 1.0 }),
        ),
        ItemTemplate::new(
            ItemId::HealthPotion,
            "Health Potion",
            3.0,
            0.0,
            "healthPotion",
            ItemKind::Consumable(ConsumableData {
                deterioration: Deterioration::new(3, 1.0),
                action: UseAction::RestoreHealth(10.0),
            }),
        ),
        ItemTemplate::new(
            ItemId::ManaPotion,
            "Mana Potion",
            1.0,
            0.0,
            "manaPotion",
            ItemKind::Consumable(ConsumableData {
                deterioration: Deterioration::new(3, 3.0),
                action: UseAction::RestoreMana(1.0),
            }),
        ),
        ItemTemplate::new(
            ItemId::Arrow,
            "Arrow",
            1.0,
            10.0,
            "arrow",
            ItemKind::Resource(ResourceData {
                deterioration: Deterioration::new(3, 60.0),
                value_decrement: 1.0,
            }),
        ),
        ItemTemplate::new(
            ItemId::Wood,
            "Wood",
            1.0,
            10.0,
            "wood",
            ItemKind::Resource(ResourceData {
                deterioration: Deterioration::new(3, 3.0),
                value_decrement: 1.0,
            }),
        ),
        ItemTemplate::new(ItemId::Trash, "Trash", 1.0, 0.0, "trash", ItemKind::Trash),
    ]
}
