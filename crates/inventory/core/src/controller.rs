//! Inventory controller: orchestrates catalog, store, and scheduler.
//!
//! The controller exclusively owns the [`InventoryStore`] and the
//! [`DeteriorationScheduler`]. All commands go through `&mut self`, and the
//! events they produce are published only after the command has finished
//! mutating state.
//!
//! # Deterioration flow
//!
//! ```text
//! tick(elapsed) ─▶ scheduler.tick ─▶ [expired instances]
//!                                        │
//!                 on_deterioration_expired(instance)
//!                   ├─ level < max  ─▶ re-derive asset, re-arm timer
//!                   └─ level == max ─▶ terminal outcome
//!                                       ├─ Consumable: replace with trash
//!                                       └─ Resource:   lose value, retire timer
//! ```

use std::collections::HashMap;

use tokio::sync::broadcast;

use crate::catalog::{CatalogError, ItemCatalog};
use crate::config::{ConfigError, InventoryConfig};
use crate::error::InventoryError;
use crate::event::{EventBus, InventoryEvent, Topic, TopicSet};
use crate::item::{
    ActionReport, DeteriorationStep, InstanceId, Item, ItemId, ItemInfo, TerminalOutcome,
};
use crate::scheduler::DeteriorationScheduler;
use crate::store::{InventoryStore, StoreEvent};

/// Orchestrator wiring catalog, store, scheduler, and the outward event bus.
#[derive(Debug)]
pub struct InventoryController {
    catalog: ItemCatalog,
    store: InventoryStore,
    scheduler: DeteriorationScheduler,
    bus: EventBus,
    pending: Vec<InventoryEvent>,
}

impl InventoryController {
    pub fn new(catalog: ItemCatalog, config: &InventoryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog,
            store: InventoryStore::new(config)?,
            scheduler: DeteriorationScheduler::new(),
            bus: EventBus::new(),
            pending: Vec::new(),
        })
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn scheduler(&self) -> &DeteriorationScheduler {
        &self.scheduler
    }

    pub fn item_info(&self, index: usize) -> Option<ItemInfo> {
        self.store.get(index).map(Item::info)
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<InventoryEvent> {
        self.bus.subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: TopicSet,
    ) -> HashMap<Topic, broadcast::Receiver<InventoryEvent>> {
        self.bus.subscribe_multiple(topics)
    }

    /// Every event in publish order, across all topics.
    pub fn subscribe_all(&self) -> broadcast::Receiver<InventoryEvent> {
        self.bus.subscribe_all()
    }

    // ===== commands =====

    /// Generates a fresh `id` from the catalog and adds it.
    ///
    /// The outer `Result` reports a missing template; the `bool` is the
    /// store's verdict on capacity and weight.
    pub fn add_item_by_id(&mut self, id: ItemId) -> Result<bool, CatalogError> {
        let item = self.catalog.generate(id)?;
        Ok(self.add_item(item))
    }

    pub fn add_item(&mut self, item: Item) -> bool {
        let instance = item.instance();
        let added = self.store.add(item);
        if added {
            self.arm(instance);
        }
        self.flush();
        added
    }

    pub fn add_item_at(&mut self, item: Item, index: usize) -> bool {
        let instance = item.instance();
        let added = self.store.add_at(item, index);
        if added {
            self.arm(instance);
        }
        self.flush();
        added
    }

    /// Removes whatever occupies `index`; invalid or empty slots are a no-op.
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        let removed = self.store.remove(index);
        if let Some(item) = &removed {
            self.scheduler.untrack(item.instance());
        }
        self.flush();
        removed
    }

    /// Removes the item with the given identity, returning its former index.
    pub fn remove_instance(&mut self, instance: InstanceId) -> Option<usize> {
        let index = self.store.remove_item(instance);
        if index.is_some() {
            self.scheduler.untrack(instance);
        }
        self.flush();
        index
    }

    /// Uses the consumable at `index`: performs its action, then removes it.
    ///
    /// Returns `None` and changes nothing if the slot holds no usable item.
    pub fn use_item(&mut self, index: usize) -> Option<ActionReport> {
        let item = self.store.get(index)?;
        let instance = item.instance();
        let Some(action) = item.use_action().copied() else {
            tracing::trace!(index, %instance, "use ignored: item has no use-action");
            return None;
        };

        let report = action.perform();
        self.scheduler.untrack(instance);
        self.store.remove(index);
        self.emit(InventoryEvent::ActionPerformed {
            instance,
            report: report.clone(),
        });
        self.flush();
        Some(report)
    }

    pub fn sell_item(&mut self, index: usize) -> bool {
        let instance = self.store.get(index).map(Item::instance);
        let sold = self.store.sell(index);
        if let (true, Some(instance)) = (sold, instance) {
            self.scheduler.untrack(instance);
        }
        self.flush();
        sold
    }

    pub fn swap_items(&mut self, a: usize, b: usize) {
        self.store.swap(a, b);
        self.flush();
    }

    /// Advances every deterioration timer by `elapsed` seconds and applies
    /// the consequences. Returns how many expirations were handled.
    pub fn tick(&mut self, elapsed: f32) -> usize {
        let expired = self.scheduler.tick(elapsed);
        for &instance in &expired {
            self.apply_deterioration(instance);
        }
        self.flush();
        expired.len()
    }

    /// Handles one expired timer as if the scheduler had reported it.
    pub fn on_deterioration_expired(&mut self, instance: InstanceId) {
        self.apply_deterioration(instance);
        self.flush();
    }

    /// Pushes every deteriorable item in the inventory one level forward,
    /// bypassing the timers.
    pub fn force_all_next_level(&mut self) {
        let instances = self.store.all_deteriorable();
        tracing::debug!(count = instances.len(), "forcing next deterioration level");
        for instance in instances {
            self.scheduler.untrack(instance);
            self.apply_deterioration(instance);
        }
        self.flush();
    }

    // ===== internals =====

    /// Starts the timer for a freshly placed item, unless it cannot age further.
    fn arm(&mut self, instance: InstanceId) {
        if let Some(item) = self.store.find(instance)
            && item.deterioration().is_some_and(|d| !d.is_exhausted())
        {
            self.scheduler.track(item);
        }
    }

    fn apply_deterioration(&mut self, instance: InstanceId) {
        let Some(item) = self.store.find(instance) else {
            tracing::trace!(%instance, "deterioration ignored: item no longer in inventory");
            return;
        };
        if item.deterioration().is_none_or(|d| d.is_exhausted()) {
            tracing::trace!(%instance, "deterioration ignored: nothing left to deteriorate");
            return;
        }

        let Some((index, Some(step))) = self.store.update(instance, Item::deteriorate) else {
            return;
        };

        match step {
            DeteriorationStep::Advanced(level) => {
                self.arm(instance);
                let market_value = self.store.get(index).map_or(0.0, Item::market_value);
                tracing::debug!(%instance, index, level, "item deteriorated");
                self.emit(InventoryEvent::DeteriorationApplied {
                    index,
                    instance,
                    level,
                    market_value,
                });
            }
            DeteriorationStep::Terminal => self.apply_terminal(index, instance),
            DeteriorationStep::Exhausted => {}
        }
    }

    fn apply_terminal(&mut self, index: usize, instance: InstanceId) {
        self.scheduler.untrack(instance);
        let Some(item) = self.store.get(index) else {
            return;
        };
        let level = item.deterioration().map_or(0, |d| d.level);
        let outcome = item.kind().terminal_outcome();

        match outcome {
            Some(TerminalOutcome::ReplaceWithTrash) => {
                let trash = match self.catalog.trash_from(item) {
                    Ok(trash) => trash,
                    Err(err) => {
                        tracing::error!(%instance, %err, "cannot transform deteriorated item");
                        return;
                    }
                };
                let into = trash.id();
                match self.store.replace(instance, trash) {
                    Ok(index) => {
                        tracing::info!(%instance, index, %into, "item fully deteriorated and transformed");
                        self.emit(InventoryEvent::ItemTransformed {
                            index,
                            from: instance,
                            into,
                        });
                    }
                    Err(err) if err.severity().is_recoverable() => {
                        tracing::warn!(%instance, %err, "deteriorated item kept in place");
                    }
                    Err(err) => {
                        tracing::error!(
                            %instance,
                            %err,
                            severity = err.severity().as_str(),
                            code = err.error_code(),
                            "deteriorated item kept in place"
                        );
                    }
                }
            }
            Some(TerminalOutcome::DecayValue(amount)) => {
                let Some((index, market_value)) =
                    self.store.update(instance, |item| item.lose_value(amount))
                else {
                    return;
                };
                tracing::info!(%instance, index, market_value, "item fully deteriorated and lost value");
                self.emit(InventoryEvent::DeteriorationApplied {
                    index,
                    instance,
                    level,
                    market_value,
                });
            }
            None => {
                tracing::error!(%instance, "terminal deterioration on an item without outcome");
            }
        }
    }

    /// Queues a controller event behind the store events that preceded it.
    fn emit(&mut self, event: InventoryEvent) {
        self.collect_store_events();
        self.pending.push(event);
    }

    /// Converts queued store notices into outward events.
    ///
    /// Slot events carry the slot's current contents, so repeats of the same
    /// index within one batch collapse into the first.
    fn collect_store_events(&mut self) {
        let mut announced: Vec<usize> = Vec::new();
        for event in self.store.drain_events() {
            let event = match event {
                StoreEvent::SlotChanged(index) => {
                    if announced.contains(&index) {
                        continue;
                    }
                    announced.push(index);
                    InventoryEvent::SlotChanged {
                        index,
                        item: self.store.get(index).map(Item::info),
                    }
                }
                StoreEvent::WeightChanged(weight) => InventoryEvent::WeightChanged(weight),
                StoreEvent::CurrencyChanged(currency) => InventoryEvent::CurrencyChanged(currency),
            };
            self.pending.push(event);
        }
    }

    /// Publishes everything queued during the current command.
    fn flush(&mut self) {
        self.collect_store_events();
        for event in std::mem::take(&mut self.pending) {
            self.bus.publish(event);
        }
    }
}
