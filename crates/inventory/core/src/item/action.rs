//! Use-actions carried by consumables.

/// Effect triggered when a consumable is used.
///
/// The core never interprets the effect; it performs the action and hands the
/// resulting [`ActionReport`] to whoever listens.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseAction {
    /// Restore health points.
    RestoreHealth(f32),

    /// Restore mana points.
    RestoreMana(f32),
}

impl UseAction {
    pub fn perform(&self) -> ActionReport {
        let message = match self {
            Self::RestoreHealth(amount) => format!("Healed {amount} HP"),
            Self::RestoreMana(amount) => format!("Restored {amount} MP"),
        };
        tracing::debug!(action = ?self, %message, "use-action performed");
        ActionReport {
            action: *self,
            message,
        }
    }
}

/// Outcome of performing a [`UseAction`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub action: UseAction,
    pub message: String,
}

impl core::fmt::Display for ActionReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
