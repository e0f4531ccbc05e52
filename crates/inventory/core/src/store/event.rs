//! Change notifications emitted by the store.

/// Raw store notification. Slot contents are read back from the store by the
/// owner when it republishes, so the event only names the index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoreEvent {
    SlotChanged(usize),
    WeightChanged(f32),
    CurrencyChanged(f32),
}
