//! Transaction records
//!
//! Immutable ledger entries produced by typed transactions. The amount is
//! stored already normalized: debits negative, credits positive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Transaction identifier, strictly increasing and never reused
pub type TransactionId = i64;

/// Closed set of operation-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OperationType {
    /// Code 1
    Withdrawal,
    /// Code 2
    Purchase,
    /// Code 3
    SecondaryWithdrawal,
    /// Code 4
    Credit,
}

/// Error for codes outside `1..=4`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation type: {0}")]
pub struct UnknownOperationType(pub i32);

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Withdrawal,
        OperationType::Purchase,
        OperationType::SecondaryWithdrawal,
        OperationType::Credit,
    ];

    pub fn code(self) -> i32 {
        match self {
            OperationType::Withdrawal => 1,
            OperationType::Purchase => 2,
            OperationType::SecondaryWithdrawal => 3,
            OperationType::Credit => 4,
        }
    }

    /// Look up a code, `None` when outside the closed set
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    pub fn is_debit(self) -> bool {
        !matches!(self, OperationType::Credit)
    }

    /// Sign a positive amount: debits negative, credits positive
    pub fn normalize(self, amount: i64) -> i64 {
        if self.is_debit() {
            -amount
        } else {
            amount
        }
    }
}

impl TryFrom<i32> for OperationType {
    type Error = UnknownOperationType;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownOperationType(code))
    }
}

impl From<OperationType> for i32 {
    fn from(op: OperationType) -> Self {
        op.code()
    }
}

/// Committed ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    transaction_id: TransactionId,
    account_id: String,
    #[serde(rename = "operationTypeId")]
    operation_type: OperationType,
    amount: i64,
    event_date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_id: TransactionId,
        account_id: impl Into<String>,
        operation_type: OperationType,
        amount: i64,
        event_date: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id,
            account_id: account_id.into(),
            operation_type,
            amount,
            event_date,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn event_date(&self) -> DateTime<Utc> {
        self.event_date
    }

    /// Inclusive on both ends
    pub fn occurred_between(&self, begin: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        begin <= self.event_date && self.event_date <= end
    }

    /// Calendar day in UTC, the same zone timestamps are assigned in
    pub fn occurred_on(&self, date: NaiveDate) -> bool {
        self.event_date.date_naive() == date
    }
}
