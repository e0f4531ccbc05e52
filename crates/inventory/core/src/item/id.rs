//! Item identifiers.
//!
//! - [`ItemId`]: which catalog template an item came from
//! - [`InstanceId`]: which concrete instance it is

use std::sync::atomic::{AtomicU64, Ordering};

/// Catalog identifier. Every variant must have exactly one template.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemId {
    Sword,
    Bow,
    HealthPotion,
    ManaPotion,
    Arrow,
    Wood,
    Trash,
}

impl ItemId {
    /// Returns every catalog identifier in declaration order.
    pub fn all() -> impl Iterator<Item = ItemId> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

/// Identity of a generated item instance.
///
/// Two instances cloned from the same template compare unequal here even when
/// every other field matches. Store lookups and scheduler entries key on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

impl InstanceId {
    /// Allocates an identity never returned before in this process.
    pub fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl core::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
