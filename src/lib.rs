//! coreBanking Library
//!
//! In-memory banking ledger: account store, transaction log and the
//! services enforcing funds, overdraft and atomic transfer rules, plus a
//! thin HTTP adapter.

pub mod api;
pub mod domain;
pub mod reporting;
pub mod services;
pub mod store;

pub mod config;
mod error;

pub use config::Config;
pub use domain::{Account, DomainError, EventOutcome, EventRequest, LedgerEvent, OperationType, Transaction};
pub use error::{AppError, AppResult, ErrorResponse};
pub use services::{AccountService, Ledger, TransactionService};
