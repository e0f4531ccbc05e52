//! Scripted inventory commands, keyed by the tick they run on.

use std::path::Path;

use anyhow::Context;
use inventory_core::{InventoryController, ItemId};
use serde::{Deserialize, Serialize};

/// A command accepted by the inventory controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Add(ItemId),
    Remove(usize),
    Use(usize),
    Sell(usize),
    Swap(usize, usize),
    ForceNextLevel,
}

impl Command {
    /// Issues the command. Rejections are logged, never fatal.
    pub fn apply(&self, inventory: &mut InventoryController) -> anyhow::Result<()> {
        match self {
            Self::Add(id) => {
                if !inventory.add_item_by_id(*id)? {
                    tracing::info!(%id, "inventory refused item");
                }
            }
            Self::Remove(index) => {
                if inventory.remove_item(*index).is_none() {
                    tracing::info!(index, "nothing to remove");
                }
            }
            Self::Use(index) => match inventory.use_item(*index) {
                Some(report) => tracing::info!(index, %report, "item used"),
                None => tracing::info!(index, "slot holds nothing usable"),
            },
            Self::Sell(index) => {
                if !inventory.sell_item(*index) {
                    tracing::info!(index, "slot holds nothing sellable");
                }
            }
            Self::Swap(a, b) => inventory.swap_items(*a, *b),
            Self::ForceNextLevel => inventory.force_all_next_level(),
        }
        Ok(())
    }
}

/// Commands to issue before the given tick runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub tick: u32,
    pub command: Command,
}

/// Ordered list of scripted steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut script: Script = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))?;
        script.steps.sort_by_key(|step| step.tick);
        Ok(script)
    }

    /// Built-in walkthrough touching every command.
    pub fn builtin() -> Self {
        let at = |tick, command| ScriptStep { tick, command };
        Self {
            steps: vec![
                at(0, Command::Add(ItemId::Sword)),
                at(0, Command::Add(ItemId::HealthPotion)),
                at(0, Command::Add(ItemId::ManaPotion)),
                at(0, Command::Add(ItemId::Wood)),
                at(0, Command::Add(ItemId::Arrow)),
                at(1, Command::Swap(0, 4)),
                at(2, Command::Use(2)),
                at(3, Command::Sell(0)),
                at(8, Command::ForceNextLevel),
                at(10, Command::Add(ItemId::Bow)),
                at(12, Command::Remove(0)),
            ],
        }
    }

    /// Steps scheduled for `tick`, in script order.
    pub fn steps_at(&self, tick: u32) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter().filter(move |step| step.tick == tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_orders_steps() {
        let script = Script::parse(
            "(steps: [
                (tick: 3, command: Sell(0)),
                (tick: 1, command: Add(Wood)),
                (tick: 2, command: Swap(0, 1)),
            ])",
        )
        .unwrap();

        let ticks: Vec<_> = script.steps.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
        assert_eq!(script.steps[0].command, Command::Add(ItemId::Wood));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Script::load(&dir.path().join("missing.ron")).unwrap_err();
        assert!(err.to_string().contains("missing.ron"));
    }

    #[test]
    fn bundled_decay_script_parses() {
        let script = Script::parse(include_str!("../scripts/decay.ron")).unwrap();
        assert_eq!(script.steps_at(0).count(), 4);
        assert_eq!(script.steps.last().unwrap().command, Command::Sell(2));
    }

    #[test]
    fn builtin_script_starts_with_adds() {
        let script = Script::builtin();
        assert_eq!(script.steps_at(0).count(), 5);
    }
}
