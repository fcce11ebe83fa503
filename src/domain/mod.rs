//! Domain module
//!
//! Core ledger types and the business rules that act on a single account.

pub mod account;
pub mod error;
pub mod events;
pub mod transaction;

pub use account::Account;
pub use error::DomainError;
pub use events::{EventOutcome, EventRequest, LedgerEvent};
pub use transaction::{OperationType, Transaction, TransactionId};
