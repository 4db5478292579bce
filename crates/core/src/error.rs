//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Business-rule violations (not-found, insufficient stock, bad input) are
/// expected outcomes and travel back to callers as values for direct display.
/// `StorageUnavailable` is the only infrastructure-shaped variant;
/// `InconsistentState` marks a failed compensating rollback and must be
/// escalated, never swallowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced record does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A deduction would drive stock below zero.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A quantity input was non-positive, non-finite, or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A request payload failed boundary validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A cross-entity rollback itself failed; stock and records may diverge.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// The storage layer could not complete the operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn insufficient_stock(available: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentState(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// True for expected business-rule outcomes that callers display and never retry.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::InvalidQuantity(_)
                | Self::Validation(_)
                | Self::InvalidId(_)
        )
    }
}
