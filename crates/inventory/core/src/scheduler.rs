//! Deterioration scheduler: per-item countdowns driven by an external clock.
//!
//! The scheduler only counts down. It reports which items expired in a tick
//! and leaves every consequence (level changes, transformations, re-arming)
//! to its owner.

use crate::item::{InstanceId, Item};

/// Registry of deterioration countdowns, keyed by item identity.
///
/// Entries keep insertion order so expirations within one tick are reported
/// deterministically.
#[derive(Clone, Debug, Default)]
pub struct DeteriorationScheduler {
    timers: Vec<Timer>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Timer {
    instance: InstanceId,
    remaining: f32,
}

impl DeteriorationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts, or restarts, the countdown for `item` at its level interval.
    ///
    /// Items without the deterioration capability are ignored. Returns true
    /// if a countdown is now armed.
    pub fn track(&mut self, item: &Item) -> bool {
        let Some(deterioration) = item.deterioration() else {
            tracing::trace!(instance = %item.instance(), "track ignored: item does not deteriorate");
            return false;
        };
        let instance = item.instance();
        let interval = deterioration.interval;

        match self.position(instance) {
            Some(index) => self.timers[index].remaining = interval,
            None => self.timers.push(Timer {
                instance,
                remaining: interval,
            }),
        }
        tracing::trace!(%instance, interval, "deterioration timer armed");
        true
    }

    /// Stops the countdown for `instance`. Returns true if one was running.
    pub fn untrack(&mut self, instance: InstanceId) -> bool {
        match self.position(instance) {
            Some(index) => {
                self.timers.remove(index);
                tracing::trace!(%instance, "deterioration timer retired");
                true
            }
            None => false,
        }
    }

    pub fn is_tracked(&self, instance: InstanceId) -> bool {
        self.position(instance).is_some()
    }

    /// Seconds left before `instance` expires, if tracked.
    pub fn remaining(&self, instance: InstanceId) -> Option<f32> {
        self.position(instance).map(|index| self.timers[index].remaining)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advances every countdown by `elapsed` seconds.
    ///
    /// Returns the items whose countdown reached zero, each exactly once, in
    /// registration order. Expired entries are removed; re-arming them is the
    /// caller's job. The set of timers visited is fixed at the start of the
    /// tick.
    pub fn tick(&mut self, elapsed: f32) -> Vec<InstanceId> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            tracing::warn!(elapsed, "tick ignored: elapsed time must be finite and non-negative");
            return Vec::new();
        }

        let snapshot: Vec<InstanceId> = self.timers.iter().map(|timer| timer.instance).collect();
        let mut expired = Vec::new();

        for instance in snapshot {
            let Some(index) = self.position(instance) else {
                continue;
            };
            let timer = &mut self.timers[index];
            timer.remaining -= elapsed;
            if timer.remaining <= 0.0 {
                self.timers.remove(index);
                expired.push(instance);
            }
        }

        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "deterioration timers expired");
        }
        expired
    }

    fn position(&self, instance: InstanceId) -> Option<usize> {
        self.timers
            .iter()
            .position(|timer| timer.instance == instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemCatalog;
    use crate::item::ItemId;

    #[test]
    fn track_ignores_non_deteriorable_items() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let sword = catalog.generate(ItemId::Sword).unwrap();
        assert!(!scheduler.track(&sword));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn retrack_resets_countdown() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let wood = catalog.generate(ItemId::Wood).unwrap();

        scheduler.track(&wood);
        scheduler.tick(2.0);
        assert_eq!(scheduler.remaining(wood.instance()), Some(1.0));

        scheduler.track(&wood);
        assert_eq!(scheduler.remaining(wood.instance()), Some(3.0));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn expires_when_countdown_reaches_zero() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let potion = catalog.generate(ItemId::HealthPotion).unwrap();
        scheduler.track(&potion);

        assert!(scheduler.tick(0.5).is_empty());
        assert_eq!(scheduler.tick(0.5), vec![potion.instance()]);
        assert!(!scheduler.is_tracked(potion.instance()));
        assert!(scheduler.tick(10.0).is_empty());
    }

    #[test]
    fn reports_every_expiration_once_in_order() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let a = catalog.generate(ItemId::HealthPotion).unwrap();
        let b = catalog.generate(ItemId::Wood).unwrap();
        let c = catalog.generate(ItemId::ManaPotion).unwrap();
        scheduler.track(&a);
        scheduler.track(&b);
        scheduler.track(&c);

        let expired = scheduler.tick(5.0);
        assert_eq!(expired, vec![a.instance(), b.instance(), c.instance()]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn untrack_stops_countdown() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let wood = catalog.generate(ItemId::Wood).unwrap();
        scheduler.track(&wood);

        assert!(scheduler.untrack(wood.instance()));
        assert!(!scheduler.untrack(wood.instance()));
        assert!(scheduler.tick(100.0).is_empty());
    }

    #[test]
    fn negative_elapsed_is_ignored() {
        let catalog = ItemCatalog::build();
        let mut scheduler = DeteriorationScheduler::new();
        let wood = catalog.generate(ItemId::Wood).unwrap();
        scheduler.track(&wood);

        assert!(scheduler.tick(-1.0).is_empty());
        assert!(scheduler.tick(f32::NAN).is_empty());
        assert_eq!(scheduler.remaining(wood.instance()), Some(3.0));
    }
}
