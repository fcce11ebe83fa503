//! Account
//!
//! A balance-holding entity identified by an opaque string id. Balances are
//! signed integers in the smallest currency unit; the overdraft limit is the
//! extra room below zero that debits may use.

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Account snapshot.
///
/// # Invariants
/// - `balance >= -overdraft_limit` after every committed debit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: String,
    balance: i64,
    overdraft_limit: i64,
}

impl Account {
    /// Create an empty account (zero balance, zero overdraft)
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: 0,
            overdraft_limit: 0,
        }
    }

    // =========================================================================
    // Balance mutation
    // =========================================================================

    /// Funds that a debit may consume: balance plus overdraft room
    pub fn available(&self) -> i64 {
        self.balance.saturating_add(self.overdraft_limit)
    }

    /// Add a signed delta to the balance without consulting the overdraft
    pub fn adjust(&mut self, delta: i64) -> Result<(), DomainError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or_else(|| DomainError::InvalidAmount("balance overflow".to_string()))?;
        Ok(())
    }

    /// Credit `amount` to the balance.
    ///
    /// Credits never consult the overdraft limit.
    pub fn credit(&mut self, amount: i64) -> Result<(), DomainError> {
        self.adjust(amount)
    }

    /// Debit `amount` from the balance, allowing the overdraft room.
    ///
    /// The account is left untouched when funds are insufficient.
    pub fn debit(&mut self, amount: i64) -> Result<(), DomainError> {
        self.ensure_available(amount)?;
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| DomainError::InvalidAmount("balance underflow".to_string()))?;
        Ok(())
    }

    /// Check that a debit of `amount` stays above the overdraft floor
    pub fn ensure_available(&self, amount: i64) -> Result<(), DomainError> {
        let available = self.available();
        if available < amount {
            return Err(DomainError::insufficient_funds(amount, available));
        }
        Ok(())
    }

    pub fn set_overdraft_limit(&mut self, limit: i64) {
        self.overdraft_limit = limit;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn overdraft_limit(&self) -> i64 {
        self.overdraft_limit
    }
}
