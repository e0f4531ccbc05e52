//! Fixed-step loop feeding elapsed time and scripted commands to the controller.

use inventory_core::{InventoryController, InventoryEvent};
use tokio::sync::broadcast::Receiver;

use crate::script::Script;

/// Totals reported once the loop finishes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u32,
    pub expirations: usize,
    pub events: usize,
    pub occupied: usize,
    pub weight: f32,
    pub currency: f32,
}

pub struct Driver {
    inventory: InventoryController,
    events: Receiver<InventoryEvent>,
    script: Script,
}

impl Driver {
    pub fn new(inventory: InventoryController, script: Script) -> Self {
        let events = inventory.subscribe_all();
        Self {
            inventory,
            events,
            script,
        }
    }

    pub fn inventory(&self) -> &InventoryController {
        &self.inventory
    }

    /// Runs `ticks` steps of `tick_seconds` each.
    pub fn run(&mut self, ticks: u32, tick_seconds: f32) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();

        for tick in 0..ticks {
            for step in self.script.steps_at(tick) {
                tracing::debug!(tick, command = ?step.command, "issuing command");
                step.command.apply(&mut self.inventory)?;
            }

            summary.expirations += self.inventory.tick(tick_seconds);
            summary.events += self.log_events(tick);
            summary.ticks += 1;
        }

        let store = self.inventory.store();
        summary.occupied = store.len();
        summary.weight = store.weight();
        summary.currency = store.currency();
        Ok(summary)
    }

    fn log_events(&mut self, tick: u32) -> usize {
        let events = inventory_core::drain(&mut self.events);
        for event in &events {
            match event {
                InventoryEvent::SlotChanged { index, item } => match item {
                    Some(info) => tracing::info!(tick, index, name = %info.name, asset = %info.asset, "slot changed"),
                    None => tracing::info!(tick, index, "slot emptied"),
                },
                InventoryEvent::WeightChanged(weight) => tracing::info!(tick, weight, "weight changed"),
                InventoryEvent::CurrencyChanged(currency) => {
                    tracing::info!(tick, currency, "currency changed")
                }
                InventoryEvent::DeteriorationApplied {
                    index,
                    level,
                    market_value,
                    ..
                } => tracing::info!(tick, index, level, market_value, "deterioration applied"),
                InventoryEvent::ItemTransformed { index, into, .. } => {
                    tracing::info!(tick, index, %into, "item transformed")
                }
                InventoryEvent::ActionPerformed { report, .. } => {
                    tracing::info!(tick, %report, "action performed")
                }
            }
        }
        events.len()
    }
}
