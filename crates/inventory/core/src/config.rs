//! Inventory configuration and tunable limits.

use crate::error::{ErrorSeverity, InventoryError};

/// Capacity and weight ceiling of an inventory, fixed at initialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InventoryConfig {
    /// Number of slots. The slot array never grows or shrinks.
    pub capacity: usize,
    /// Maximum accumulated weight the inventory accepts.
    pub weight_limit: f32,
}

impl InventoryConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CAPACITY: usize = 24;
    pub const DEFAULT_WEIGHT_LIMIT: f32 = 100.0;

    pub fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            weight_limit: Self::DEFAULT_WEIGHT_LIMIT,
        }
    }

    pub fn with_capacity_and_limit(capacity: usize, weight_limit: f32) -> Self {
        Self {
            capacity,
            weight_limit,
        }
    }

    /// Rejects configurations that could never hold an item.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.weight_limit.is_finite() || self.weight_limit < 0.0 {
            return Err(ConfigError::InvalidWeightLimit(self.weight_limit));
        }
        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised by [`InventoryConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("inventory capacity must be at least one slot")]
    ZeroCapacity,

    #[error("weight limit must be a finite non-negative number, got {0}")]
    InvalidWeightLimit(f32),
}

impl InventoryError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroCapacity => "CONFIG_ZERO_CAPACITY",
            Self::InvalidWeightLimit(_) => "CONFIG_INVALID_WEIGHT_LIMIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InventoryConfig::default();
        assert_eq!(config.capacity, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = InventoryConfig::with_capacity_and_limit(0, 10.0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_negative_limit() {
        let config = InventoryConfig::with_capacity_and_limit(4, -1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeightLimit(_))
        ));
    }
}
