//! Store module
//!
//! Memory-resident shared state of the ledger. Each store owns its own
//! reader/writer lock; no store method ever takes another store's lock.

mod accounts;
mod error;
mod sequence;
mod transactions;

pub use accounts::AccountStore;
pub use error::{StoreError, StoreResult};
pub use sequence::TransactionIdGenerator;
pub use transactions::TransactionLog;
