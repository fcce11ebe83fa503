//! Ledger services
//!
//! Business operations over the shared stores. Both services hold the same
//! `AccountStore`; only the transaction service writes to the log.

mod account_service;
mod commands;
mod transaction_service;


use std::sync::Arc;

use crate::store::{AccountStore, TransactionIdGenerator, TransactionLog};

pub use account_service::AccountService;
pub use commands::{AccountRef, CreateTransactionCommand, UNKNOWN_DOCUMENT};
pub use transaction_service::TransactionService;

/// Both services wired to one set of stores
#[derive(Debug, Clone)]
pub struct Ledger {
    pub accounts: Arc<AccountService>,
    pub transactions: Arc<TransactionService>,
}

impl Ledger {
    pub fn new(
        accounts: Arc<AccountStore>,
        transactions: Arc<TransactionLog>,
        ids: Arc<TransactionIdGenerator>,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(accounts.clone())),
            transactions: Arc::new(TransactionService::new(accounts, transactions, ids)),
        }
    }

    /// Fresh, empty ledger
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(AccountStore::new()),
            Arc::new(TransactionLog::new()),
            Arc::new(TransactionIdGenerator::new()),
        )
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_memory()
    }
}
