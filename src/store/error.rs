//! Store Errors
//!
//! Error types for the in-memory stores.

/// Store Result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock
    #[error("Lock poisoned: {0} store")]
    LockPoisoned(&'static str),

    /// A paired update named the same record on both sides
    #[error("Paired update needs two distinct accounts, got {0} twice")]
    SameRecord(String),
}

impl StoreError {
    /// Name of the store whose lock failed
    pub fn store(&self) -> &'static str {
        match self {
            StoreError::LockPoisoned(store) => store,
            StoreError::SameRecord(_) => "account",
        }
    }
}
