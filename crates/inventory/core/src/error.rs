//! Common error infrastructure for inventory-core.
//!
//! Domain-specific errors (e.g. `CatalogError`, `ReplaceError`) live next to
//! the component that raises them. This module holds the classification they
//! share.
//!
//! Expected, frequent outcomes (full inventory, weight ceiling, unsellable
//! item, stale slot index) are *not* errors: they surface as `bool` or
//! `Option` returns. Only genuinely exceptional conditions get a type here.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Caller can retry with different input or after the state changes.
    Recoverable,

    /// Invalid input; the caller must not proceed with the result.
    ///
    /// Example: generating an id the catalog has no template for.
    Validation,

    /// Core state disagrees with itself. Indicates a bug.
    Internal,

    /// Packaging or configuration defect detected at startup.
    ///
    /// Example: a catalog table missing a required template.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true for defects that should stop startup rather than be handled.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all inventory-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not by impact
pub trait InventoryError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
