//! Command definitions
//!
//! Inputs and results of the ledger services.

use serde::{Deserialize, Serialize};

/// Document number reported for accounts with no document mapping
pub const UNKNOWN_DOCUMENT: &str = "UNKNOWN";

/// Command to record a typed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionCommand {
    pub account_id: String,
    /// Operation-type code, must be one of 1..=4
    pub operation_type_id: i32,
    /// Positive magnitude; the sign comes from the operation type
    pub amount: i64,
}

impl CreateTransactionCommand {
    pub fn new(account_id: impl Into<String>, operation_type_id: i32, amount: i64) -> Self {
        Self {
            account_id: account_id.into(),
            operation_type_id,
            amount,
        }
    }
}

/// Account id paired with its document number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub account_id: String,
    pub document_number: String,
}

impl AccountRef {
    pub fn new(account_id: impl Into<String>, document_number: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            document_number: document_number.into(),
        }
    }

    /// Whether the reverse document lookup found nothing
    pub fn is_unknown_document(&self) -> bool {
        self.document_number == UNKNOWN_DOCUMENT
    }
}
