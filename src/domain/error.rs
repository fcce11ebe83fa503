//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule failures returned to callers of the ledger services.
///
/// Operation-type codes outside the closed set are not represented here:
/// they are a programming error and abort the operation instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No account with this id
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// No transaction with this id
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    /// Document already mapped to an account
    #[error("Document already has an account: {0}")]
    DuplicateDocument(String),

    /// Debit would breach the overdraft floor
    #[error("Insufficient funds, including overdraft: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// Unrecognized named event type
    #[error("Invalid event type: {0}")]
    InvalidEventType(String),

    /// Non-positive amount or balance arithmetic overflow
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Event is missing an account reference it needs
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Transfer to same account
    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(required: i64, available: i64) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    /// Check if the error reports a missing account or transaction
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_) | Self::TransactionNotFound(_)
        )
    }

    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. }
                | Self::InvalidEventType(_)
                | Self::InvalidAmount(_)
                | Self::MissingField(_)
                | Self::SameAccountTransfer
        )
    }
}
