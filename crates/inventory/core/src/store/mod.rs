//! Inventory store: the slot array and its invariants.
//!
//! The store is the single source of truth for slot contents, accumulated
//! weight, and accumulated currency. Invariants:
//! - occupied slots never exceed capacity (the slot array never grows)
//! - accumulated weight equals the sum of occupied slot weights and never
//!   exceeds the weight limit through `add`/`add_at`
//! - currency only increases, and only through `sell`
//!
//! Every mutation queues [`StoreEvent`]s in the store's outbox. The owner
//! drains them with [`InventoryStore::drain_events`] once the operation has
//! completed, so listeners never observe a half-applied change.

mod event;

pub use event::StoreEvent;

use crate::config::{ConfigError, InventoryConfig};
use crate::error::{ErrorSeverity, InventoryError};
use crate::item::{InstanceId, Item};

/// Errors raised by [`InventoryStore::replace`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ReplaceError {
    #[error("item {0} is not in the inventory")]
    NotFound(InstanceId),

    #[error("replacement would raise weight to {would_be} (limit {limit})")]
    WeightLimitExceeded { would_be: f32, limit: f32 },

    #[error("item {0} already occupies another slot")]
    DuplicateInstance(InstanceId),
}

impl InventoryError for ReplaceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) => ErrorSeverity::Internal,
            Self::WeightLimitExceeded { .. } => ErrorSeverity::Recoverable,
            Self::DuplicateInstance(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "STORE_REPLACE_NOT_FOUND",
            Self::WeightLimitExceeded { .. } => "STORE_REPLACE_WEIGHT_EXCEEDED",
            Self::DuplicateInstance(_) => "STORE_REPLACE_DUPLICATE_INSTANCE",
        }
    }
}

/// Fixed-capacity, weight-constrained slot array.
#[derive(Clone, Debug)]
pub struct InventoryStore {
    slots: Vec<Option<Item>>,
    weight_limit: f32,
    weight: f32,
    currency: f32,
    outbox: Vec<StoreEvent>,
}

impl InventoryStore {
    pub fn new(config: &InventoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            slots: vec![None; config.capacity],
            weight_limit: config.weight_limit,
            weight: 0.0,
            currency: 0.0,
            outbox: Vec::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn weight_limit(&self) -> f32 {
        self.weight_limit
    }

    /// Accumulated weight of every occupied slot.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Currency earned by selling.
    pub fn currency(&self) -> f32 {
        self.currency
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index)?.as_ref()
    }

    /// Occupied slots with their indices.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    /// Returns true if an item with this identity already occupies a slot.
    pub fn contains(&self, instance: InstanceId) -> bool {
        self.find_index(instance).is_some()
    }

    /// Returns true if an item of `weight` would stay within the limit.
    pub fn fits(&self, weight: f32) -> bool {
        self.weight + weight <= self.weight_limit
    }

    /// Places `item` in the first empty slot.
    ///
    /// Returns false, without mutating anything, when the weight limit would
    /// be exceeded, no slot is free, or the item's identity is already stored.
    pub fn add(&mut self, item: Item) -> bool {
        if self.contains(item.instance()) {
            tracing::trace!(instance = %item.instance(), "add rejected: instance already stored");
            return false;
        }
        if !self.fits(item.weight()) {
            tracing::trace!(instance = %item.instance(), weight = item.weight(), "add rejected: weight limit");
            return false;
        }
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            tracing::trace!(instance = %item.instance(), "add rejected: inventory full");
            return false;
        };
        self.place(index, item);
        true
    }

    /// Places `item` at `index`; fails if the slot is occupied or out of range.
    pub fn add_at(&mut self, item: Item, index: usize) -> bool {
        if self.contains(item.instance()) {
            tracing::trace!(instance = %item.instance(), index, "add_at rejected: instance already stored");
            return false;
        }
        if !self.fits(item.weight()) {
            tracing::trace!(instance = %item.instance(), index, "add_at rejected: weight limit");
            return false;
        }
        match self.slots.get(index) {
            Some(None) => {
                self.place(index, item);
                true
            }
            _ => {
                tracing::trace!(instance = %item.instance(), index, "add_at rejected: slot unavailable");
                false
            }
        }
    }

    /// Clears the slot at `index`. Out-of-range and empty slots are no-ops.
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        let item = self.slots.get_mut(index)?.take()?;
        self.release_weight(item.weight());
        self.outbox.push(StoreEvent::SlotChanged(index));
        self.outbox.push(StoreEvent::WeightChanged(self.weight));
        tracing::debug!(instance = %item.instance(), index, weight = self.weight, "item removed");
        Some(item)
    }

    /// Removes the item with the given identity, returning its former index.
    pub fn remove_item(&mut self, instance: InstanceId) -> Option<usize> {
        let index = self.find_index(instance)?;
        self.remove(index);
        Some(index)
    }

    pub fn find(&self, instance: InstanceId) -> Option<&Item> {
        self.find_index(instance).and_then(|index| self.get(index))
    }

    pub fn find_index(&self, instance: InstanceId) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|item| item.instance() == instance)
        })
    }

    /// Puts `new` where `old` was.
    ///
    /// A replacement no heavier than the original skips the weight check,
    /// since it cannot raise the total. A heavier one must fit under the
    /// limit once the original's weight is released.
    pub fn replace(&mut self, old: InstanceId, new: Item) -> Result<usize, ReplaceError> {
        let index = self.find_index(old).ok_or(ReplaceError::NotFound(old))?;
        if new.instance() != old && self.contains(new.instance()) {
            return Err(ReplaceError::DuplicateInstance(new.instance()));
        }
        let old_weight = self.get(index).map_or(0.0, Item::weight);

        if new.weight() > old_weight {
            let would_be = self.weight - old_weight + new.weight();
            tracing::warn!(%old, new = %new.instance(), old_weight, new_weight = new.weight(), "replacement is heavier than original");
            if would_be > self.weight_limit {
                return Err(ReplaceError::WeightLimitExceeded {
                    would_be,
                    limit: self.weight_limit,
                });
            }
        }

        self.release_weight(old_weight);
        self.weight += new.weight();
        tracing::debug!(%old, new = %new.instance(), index, "item replaced");
        self.slots[index] = Some(new);
        self.outbox.push(StoreEvent::SlotChanged(index));
        self.outbox.push(StoreEvent::WeightChanged(self.weight));
        Ok(index)
    }

    /// Exchanges two slots, empty or not. Out-of-range indices are a no-op.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.slots.len() || b >= self.slots.len() {
            tracing::trace!(a, b, "swap ignored: index out of range");
            return;
        }
        self.slots.swap(a, b);
        self.outbox.push(StoreEvent::SlotChanged(a));
        self.outbox.push(StoreEvent::SlotChanged(b));
    }

    /// Sells the item at `index` for its market value.
    ///
    /// Only sellable categories (weapons and resources) are accepted; anything
    /// else, including an empty or invalid slot, returns false untouched.
    pub fn sell(&mut self, index: usize) -> bool {
        let sellable = self.get(index).is_some_and(Item::is_sellable);
        if !sellable {
            tracing::trace!(index, "sell rejected: empty or unsellable slot");
            return false;
        }
        let Some(item) = self.slots[index].take() else {
            return false;
        };

        self.release_weight(item.weight());
        self.currency += item.market_value();
        self.outbox.push(StoreEvent::SlotChanged(index));
        self.outbox.push(StoreEvent::WeightChanged(self.weight));
        self.outbox.push(StoreEvent::CurrencyChanged(self.currency));
        tracing::debug!(instance = %item.instance(), index, value = item.market_value(), currency = self.currency, "item sold");
        true
    }

    /// Identities of every occupied slot's deteriorable item, in slot order.
    pub fn all_deteriorable(&self) -> Vec<InstanceId> {
        self.occupied()
            .filter(|(_, item)| item.is_deteriorable())
            .map(|(_, item)| item.instance())
            .collect()
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Applies `f` to the item with the given identity in place and queues a
    /// slot-changed notification. Weight must not change through this path.
    pub(crate) fn update<R>(
        &mut self,
        instance: InstanceId,
        f: impl FnOnce(&mut Item) -> R,
    ) -> Option<(usize, R)> {
        let index = self.find_index(instance)?;
        let item = self.slots[index].as_mut()?;
        let result = f(item);
        self.outbox.push(StoreEvent::SlotChanged(index));
        Some((index, result))
    }

    fn place(&mut self, index: usize, item: Item) {
        self.weight += item.weight();
        tracing::debug!(instance = %item.instance(), id = %item.id(), index, weight = self.weight, "item added");
        self.slots[index] = Some(item);
        self.outbox.push(StoreEvent::SlotChanged(index));
        self.outbox.push(StoreEvent::WeightChanged(self.weight));
    }

    fn release_weight(&mut self, weight: f32) {
        // Float subtraction can undershoot; the invariant is a non-negative sum.
        self.weight = (self.weight - weight).max(0.0);
        if self.is_empty() {
            self.weight = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemCatalog;
    use crate::item::ItemId;

    fn store(capacity: usize, limit: f32) -> InventoryStore {
        InventoryStore::new(&InventoryConfig::with_capacity_and_limit(capacity, limit)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = InventoryConfig::with_capacity_and_limit(0, 10.0);
        assert!(InventoryStore::new(&config).is_err());
    }

    #[test]
    fn add_fills_first_empty_slot() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        assert!(store.add(catalog.generate(ItemId::Bow).unwrap()));
        assert!(store.add(catalog.generate(ItemId::Wood).unwrap()));
        store.remove(0);
        let arrow = catalog.generate(ItemId::Arrow).unwrap();
        let instance = arrow.instance();
        assert!(store.add(arrow));
        assert_eq!(store.find_index(instance), Some(0));
    }

    #[test]
    fn add_emits_slot_and_weight_events() {
        let catalog = ItemCatalog::build();
        let mut store = store(2, 100.0);
        store.add(catalog.generate(ItemId::Sword).unwrap());
        assert_eq!(
            store.drain_events(),
            vec![StoreEvent::SlotChanged(0), StoreEvent::WeightChanged(10.0)]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn rejected_add_leaves_no_trace() {
        let catalog = ItemCatalog::build();
        let mut store = store(1, 100.0);
        assert!(store.add(catalog.generate(ItemId::Bow).unwrap()));
        store.drain_events();
        assert!(!store.add(catalog.generate(ItemId::Bow).unwrap()));
        assert_eq!(store.weight(), 1.0);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn add_at_requires_empty_slot() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        assert!(store.add_at(catalog.generate(ItemId::Bow).unwrap(), 2));
        assert!(!store.add_at(catalog.generate(ItemId::Bow).unwrap(), 2));
        assert!(!store.add_at(catalog.generate(ItemId::Bow).unwrap(), 9));
        assert_eq!(store.len(), 1);
        assert_eq!(store.weight(), 1.0);
        assert!(store.get(2).is_some());
    }

    #[test]
    fn remove_invalid_or_empty_is_noop() {
        let mut store = store(2, 10.0);
        assert!(store.remove(5).is_none());
        assert!(store.remove(1).is_none());
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn remove_item_by_identity() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        let wood = catalog.generate(ItemId::Wood).unwrap();
        let other = catalog.generate(ItemId::Wood).unwrap();
        let instance = other.instance();
        store.add(wood);
        store.add(other);

        assert_eq!(store.remove_item(instance), Some(1));
        assert_eq!(store.remove_item(instance), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.weight(), 1.0);
    }

    #[test]
    fn replace_keeps_index_and_adjusts_weight() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        store.add(catalog.generate(ItemId::Bow).unwrap());
        let potion = catalog.generate(ItemId::HealthPotion).unwrap();
        let instance = potion.instance();
        store.add(potion);

        let mut trash = catalog.generate(ItemId::Trash).unwrap();
        trash.set_weight(2.0);
        assert_eq!(store.replace(instance, trash), Ok(1));
        assert_eq!(store.get(1).map(Item::id), Some(ItemId::Trash));
        assert_eq!(store.weight(), 3.0);
    }

    #[test]
    fn replace_heavier_item_respects_limit() {
        let catalog = ItemCatalog::build();
        let mut store = store(2, 5.0);
        let potion = catalog.generate(ItemId::HealthPotion).unwrap();
        let instance = potion.instance();
        store.add(potion);

        let mut heavy = catalog.generate(ItemId::Trash).unwrap();
        heavy.set_weight(6.0);
        assert!(matches!(
            store.replace(instance, heavy),
            Err(ReplaceError::WeightLimitExceeded { .. })
        ));
        assert_eq!(store.find_index(instance), Some(0));
        assert_eq!(store.weight(), 3.0);
    }

    #[test]
    fn same_instance_cannot_occupy_two_slots() {
        let catalog = ItemCatalog::build();
        let mut store = store(4, 100.0);
        let wood = catalog.generate(ItemId::Wood).unwrap();
        assert!(store.add(wood.clone()));
        store.drain_events();

        assert!(!store.add(wood.clone()));
        assert!(!store.add_at(wood.clone(), 3));
        assert_eq!(store.len(), 1);
        assert_eq!(store.weight(), 1.0);
        assert!(store.drain_events().is_empty());

        let forged = catalog
            .template(ItemId::Bow)
            .unwrap()
            .instantiate(wood.instance());
        assert!(!store.add(forged));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_rejects_instance_stored_elsewhere() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        let bow = catalog.generate(ItemId::Bow).unwrap();
        let arrow = catalog.generate(ItemId::Arrow).unwrap();
        let arrow_id = arrow.instance();
        store.add(bow.clone());
        store.add(arrow.clone());

        assert_eq!(
            store.replace(bow.instance(), arrow),
            Err(ReplaceError::DuplicateInstance(arrow_id))
        );
        assert_eq!(store.find_index(bow.instance()), Some(0));
        assert_eq!(store.find_index(arrow_id), Some(1));
    }

    #[test]
    fn replace_errors_are_classified() {
        let heavy = ReplaceError::WeightLimitExceeded {
            would_be: 12.0,
            limit: 10.0,
        };
        assert!(heavy.severity().is_recoverable());
        assert_eq!(heavy.severity().as_str(), "recoverable");

        let duplicate = ReplaceError::DuplicateInstance(InstanceId(4));
        assert!(!duplicate.severity().is_recoverable());
        assert_eq!(duplicate.severity().as_str(), "validation");
        assert_eq!(duplicate.error_code(), "STORE_REPLACE_DUPLICATE_INSTANCE");
    }

    #[test]
    fn replace_unknown_item_fails() {
        let catalog = ItemCatalog::build();
        let mut store = store(2, 5.0);
        let trash = catalog.generate(ItemId::Trash).unwrap();
        assert_eq!(
            store.replace(InstanceId(999), trash),
            Err(ReplaceError::NotFound(InstanceId(999)))
        );
    }

    #[test]
    fn swap_with_empty_slot_and_back() {
        let catalog = ItemCatalog::build();
        let mut store = store(3, 100.0);
        store.add(catalog.generate(ItemId::Sword).unwrap());
        let before = store.slots().to_vec();

        store.swap(0, 2);
        assert!(store.get(0).is_none());
        assert!(store.get(2).is_some());
        store.swap(0, 2);
        assert_eq!(store.slots(), before.as_slice());
    }

    #[test]
    fn swap_out_of_range_is_noop() {
        let mut store = store(2, 10.0);
        store.swap(0, 7);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn sell_only_sellable_categories() {
        let catalog = ItemCatalog::build();
        let mut store = store(4, 100.0);
        store.add(catalog.generate(ItemId::HealthPotion).unwrap());
        store.add(catalog.generate(ItemId::Trash).unwrap());
        store.add(catalog.generate(ItemId::Wood).unwrap());
        store.drain_events();

        assert!(!store.sell(0));
        assert!(!store.sell(1));
        assert!(!store.sell(3));
        assert!(store.drain_events().is_empty());

        assert!(store.sell(2));
        assert_eq!(store.currency(), 10.0);
        assert_eq!(store.weight(), 4.0);
        assert_eq!(
            store.drain_events(),
            vec![
                StoreEvent::SlotChanged(2),
                StoreEvent::WeightChanged(4.0),
                StoreEvent::CurrencyChanged(10.0),
            ]
        );
    }

    #[test]
    fn all_deteriorable_lists_consumables_and_resources() {
        let catalog = ItemCatalog::build();
        let mut store = store(5, 100.0);
        store.add(catalog.generate(ItemId::Sword).unwrap());
        let potion = catalog.generate(ItemId::ManaPotion).unwrap();
        let arrow = catalog.generate(ItemId::Arrow).unwrap();
        let expected = vec![potion.instance(), arrow.instance()];
        store.add(potion);
        store.add(catalog.generate(ItemId::Trash).unwrap());
        store.add(arrow);

        assert_eq!(store.all_deteriorable(), expected);
    }
}
