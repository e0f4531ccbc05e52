//! Item variants and their per-operation dispatch tables.
//!
//! # Design: Tag + Data Pattern
//!
//! - [`ItemKind`] carries variant-specific data (deterioration, use-action, dps)
//! - [`ItemCategory`] is the fieldless tag used by dispatch tables
//!   (sellability, terminal outcome)
//!
//! Adding a variant means one new `ItemKind` arm plus one row in each table
//! below; nothing else in the crate inspects concrete variants.

use super::action::UseAction;

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Usable, worthless, decays into trash.
    Consumable(ConsumableData),

    /// Sellable raw material that loses value once fully deteriorated.
    Resource(ResourceData),

    /// Leftovers of a fully deteriorated consumable.
    Trash,

    /// Sellable combat gear.
    Weapon(WeaponData),
}

/// Consumable-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumableData {
    pub deterioration: Deterioration,
    pub action: UseAction,
}

/// Resource-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceData {
    pub deterioration: Deterioration,
    /// Market value lost when deterioration becomes terminal.
    pub value_decrement: f32,
}

/// Weapon-specific data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    /// Damage per second.
    pub dps: f32,
}

/// Fieldless variant tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Consumable,
    Resource,
    Trash,
    Weapon,
}

impl ItemCategory {
    /// Sell-eligibility table.
    pub const fn is_sellable(&self) -> bool {
        match self {
            Self::Weapon | Self::Resource => true,
            Self::Consumable | Self::Trash => false,
        }
    }

    /// Categories whose templates are forced to zero market value.
    pub const fn is_worthless(&self) -> bool {
        matches!(self, Self::Consumable | Self::Trash)
    }
}

/// What happens to an item when its deterioration reaches the maximum level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerminalOutcome {
    /// Swap the item for trash of the same weight, in the same slot.
    ReplaceWithTrash,

    /// Keep the item but permanently lower its market value.
    DecayValue(f32),
}

impl ItemKind {
    pub const fn category(&self) -> ItemCategory {
        match self {
            Self::Consumable(_) => ItemCategory::Consumable,
            Self::Resource(_) => ItemCategory::Resource,
            Self::Trash => ItemCategory::Trash,
            Self::Weapon(_) => ItemCategory::Weapon,
        }
    }

    pub const fn deterioration(&self) -> Option<&Deterioration> {
        match self {
            Self::Consumable(data) => Some(&data.deterioration),
            Self::Resource(data) => Some(&data.deterioration),
            Self::Trash | Self::Weapon(_) => None,
        }
    }

    pub(crate) fn deterioration_mut(&mut self) -> Option<&mut Deterioration> {
        match self {
            Self::Consumable(data) => Some(&mut data.deterioration),
            Self::Resource(data) => Some(&mut data.deterioration),
            Self::Trash | Self::Weapon(_) => None,
        }
    }

    pub const fn use_action(&self) -> Option<&UseAction> {
        match self {
            Self::Consumable(data) => Some(&data.action),
            _ => None,
        }
    }

    pub const fn dps(&self) -> Option<f32> {
        match self {
            Self::Weapon(data) => Some(data.dps),
            _ => None,
        }
    }

    /// Terminal-outcome table. `None` for variants that never deteriorate.
    pub const fn terminal_outcome(&self) -> Option<TerminalOutcome> {
        match self {
            Self::Consumable(_) => Some(TerminalOutcome::ReplaceWithTrash),
            Self::Resource(data) => Some(TerminalOutcome::DecayValue(data.value_decrement)),
            Self::Trash | Self::Weapon(_) => None,
        }
    }
}

/// Deterioration capability: a level counter bounded by `max_level`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deterioration {
    /// Current level, 0 at creation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u8,
    pub max_level: u8,
    /// Seconds between two levels.
    pub interval: f32,
}

/// Result of one deterioration step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeteriorationStep {
    /// Moved to the given level, still below the maximum.
    Advanced(u8),

    /// Just reached the maximum level.
    Terminal,

    /// Already at the maximum before the step; nothing changed.
    Exhausted,
}

impl Deterioration {
    pub const fn new(max_level: u8, interval: f32) -> Self {
        Self {
            level: 0,
            max_level,
            interval,
        }
    }

    pub const fn is_exhausted(&self) -> bool {
        self.level >= self.max_level
    }

    /// Moves one level forward. Never goes past `max_level`.
    pub fn advance(&mut self) -> DeteriorationStep {
        if self.is_exhausted() {
            return DeteriorationStep::Exhausted;
        }
        self.level += 1;
        if self.level < self.max_level {
            DeteriorationStep::Advanced(self.level)
        } else {
            DeteriorationStep::Terminal
        }
    }
}
