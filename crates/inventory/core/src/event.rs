//! Outward event stream consumed by presentation collaborators.
//!
//! The controller is the only publisher. Events are delivered through
//! channels after the operation that caused them has finished, so a listener
//! always sees a consistent inventory.

use std::collections::HashMap;

use bitflags::bitflags;
use strum::{EnumCount, IntoEnumIterator};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::item::{ActionReport, InstanceId, ItemId, ItemInfo};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum::EnumIter, strum::EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topic {
    /// Slot contents changed.
    Slots,
    /// Weight and currency totals.
    Economy,
    /// Level advances, value decay, transformations.
    Deterioration,
    /// Use-actions performed.
    Actions,
}

bitflags! {
    /// Set of topics a subscriber listens to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TopicSet: u8 {
        const SLOTS = 1 << 0;
        const ECONOMY = 1 << 1;
        const DETERIORATION = 1 << 2;
        const ACTIONS = 1 << 3;
    }
}

impl From<Topic> for TopicSet {
    fn from(topic: Topic) -> Self {
        match topic {
            Topic::Slots => Self::SLOTS,
            Topic::Economy => Self::ECONOMY,
            Topic::Deterioration => Self::DETERIORATION,
            Topic::Actions => Self::ACTIONS,
        }
    }
}

/// Curated inventory events.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryEvent {
    /// A slot now holds `item`, or nothing.
    SlotChanged {
        index: usize,
        item: Option<ItemInfo>,
    },
    WeightChanged(f32),
    CurrencyChanged(f32),
    /// An item moved to a new deterioration level or lost value.
    DeteriorationApplied {
        index: usize,
        instance: InstanceId,
        level: u8,
        market_value: f32,
    },
    /// A fully deteriorated item was swapped for another item in its slot.
    ItemTransformed {
        index: usize,
        from: InstanceId,
        into: ItemId,
    },
    ActionPerformed {
        instance: InstanceId,
        report: ActionReport,
    },
}

impl InventoryEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::SlotChanged { .. } => Topic::Slots,
            Self::WeightChanged(_) | Self::CurrencyChanged(_) => Topic::Economy,
            Self::DeteriorationApplied { .. } | Self::ItemTransformed { .. } => {
                Topic::Deterioration
            }
            Self::ActionPerformed { .. } => Topic::Actions,
        }
    }
}

/// Topic-routed broadcast fan-out.
///
/// One channel per [`Topic`], plus an all-topics channel that preserves the
/// publish order across topics. Delivery is best-effort: sending with no
/// receivers is normal, and a receiver that falls more than `capacity`
/// events behind loses the oldest ones.
pub struct EventBus {
    channels: [broadcast::Sender<InventoryEvent>; Topic::COUNT],
    all: broadcast::Sender<InventoryEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: std::array::from_fn(|_| broadcast::channel(capacity).0),
            all: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<InventoryEvent> {
        &self.channels[topic as usize]
    }

    /// Publish an event to its topic and to the all-topics stream.
    pub fn publish(&self, event: InventoryEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event.clone()).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
        let _ = self.all.send(event);
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<InventoryEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns one receiver per topic in `topics`.
    pub fn subscribe_multiple(
        &self,
        topics: TopicSet,
    ) -> HashMap<Topic, broadcast::Receiver<InventoryEvent>> {
        Topic::iter()
            .filter(|&topic| topics.contains(topic.into()))
            .map(|topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every event, in publish order.
    pub fn subscribe_all(&self) -> broadcast::Receiver<InventoryEvent> {
        self.all.subscribe()
    }

    /// Live receivers for `topic`.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("all_receivers", &self.all.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Takes every event already queued on `rx` without waiting.
///
/// A lagged receiver skips the events it missed and keeps draining.
pub fn drain(rx: &mut broadcast::Receiver<InventoryEvent>) -> Vec<InventoryEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event receiver lagged; oldest events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_topic() {
        let bus = EventBus::new();
        let mut economy = bus.subscribe(Topic::Economy);
        let mut slots = bus.subscribe(Topic::Slots);
        let mut all = bus.subscribe_all();

        bus.publish(InventoryEvent::WeightChanged(4.0));

        assert_eq!(economy.try_recv().ok(), Some(InventoryEvent::WeightChanged(4.0)));
        assert!(slots.try_recv().is_err());
        assert_eq!(all.try_recv().ok(), Some(InventoryEvent::WeightChanged(4.0)));
    }

    #[test]
    fn dropped_receivers_are_released() {
        let bus = EventBus::new();
        let mut kept = bus.subscribe(Topic::Economy);
        drop(bus.subscribe(Topic::Economy));
        assert_eq!(bus.receiver_count(Topic::Economy), 1);

        bus.publish(InventoryEvent::CurrencyChanged(1.0));
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn publishing_without_receivers_is_fine() {
        let bus = EventBus::new();
        bus.publish(InventoryEvent::CurrencyChanged(1.0));
        assert_eq!(bus.receiver_count(Topic::Economy), 0);
    }

    #[test]
    fn subscribe_multiple_follows_topic_set() {
        let bus = EventBus::new();
        let mut receivers = bus.subscribe_multiple(TopicSet::SLOTS | TopicSet::ACTIONS);
        assert_eq!(receivers.len(), 2);
        assert!(!receivers.contains_key(&Topic::Economy));

        bus.publish(InventoryEvent::SlotChanged {
            index: 0,
            item: None,
        });
        bus.publish(InventoryEvent::CurrencyChanged(2.0));

        let slots = receivers.get_mut(&Topic::Slots).unwrap();
        assert_eq!(
            drain(slots),
            vec![InventoryEvent::SlotChanged {
                index: 0,
                item: None
            }]
        );
        assert!(drain(receivers.get_mut(&Topic::Actions).unwrap()).is_empty());
    }

    #[test]
    fn all_stream_keeps_cross_topic_order() {
        let bus = EventBus::new();
        let mut all = bus.subscribe_all();

        bus.publish(InventoryEvent::WeightChanged(1.0));
        bus.publish(InventoryEvent::SlotChanged {
            index: 3,
            item: None,
        });
        bus.publish(InventoryEvent::CurrencyChanged(5.0));

        let topics: Vec<_> = drain(&mut all).iter().map(InventoryEvent::topic).collect();
        assert_eq!(topics, vec![Topic::Economy, Topic::Slots, Topic::Economy]);
    }

    #[test]
    fn lagged_receiver_keeps_newest_events() {
        let bus = EventBus::with_capacity(2);
        let mut economy = bus.subscribe(Topic::Economy);

        for value in [1.0, 2.0, 3.0, 4.0] {
            bus.publish(InventoryEvent::CurrencyChanged(value));
        }

        assert_eq!(
            drain(&mut economy),
            vec![
                InventoryEvent::CurrencyChanged(3.0),
                InventoryEvent::CurrencyChanged(4.0),
            ]
        );
    }
}
