//! Named ledger events
//!
//! Deposit, withdraw and transfer requests. Unlike typed transactions these
//! mutate balances directly and leave no entry in the transaction log.

use serde::{Deserialize, Serialize};

use super::{Account, DomainError};

/// Raw event as received from a caller, before the type is checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub amount: i64,
}

impl EventRequest {
    pub fn deposit(destination: impl Into<String>, amount: i64) -> Self {
        Self {
            kind: "deposit".to_string(),
            origin: None,
            destination: Some(destination.into()),
            amount,
        }
    }

    pub fn withdraw(origin: impl Into<String>, amount: i64) -> Self {
        Self {
            kind: "withdraw".to_string(),
            origin: Some(origin.into()),
            destination: None,
            amount,
        }
    }

    pub fn transfer(origin: impl Into<String>, destination: impl Into<String>, amount: i64) -> Self {
        Self {
            kind: "transfer".to_string(),
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            amount,
        }
    }
}

/// Validated named event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Deposit {
        destination: String,
        amount: i64,
    },
    Withdraw {
        origin: String,
        amount: i64,
    },
    Transfer {
        origin: String,
        destination: String,
        amount: i64,
    },
}

impl LedgerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Deposit { .. } => "deposit",
            LedgerEvent::Withdraw { .. } => "withdraw",
            LedgerEvent::Transfer { .. } => "transfer",
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            LedgerEvent::Deposit { amount, .. }
            | LedgerEvent::Withdraw { amount, .. }
            | LedgerEvent::Transfer { amount, .. } => *amount,
        }
    }

    /// Business checks every event must pass before touching balances:
    /// a transfer needs two distinct accounts and every amount is positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let LedgerEvent::Transfer {
            origin,
            destination,
            ..
        } = self
        {
            if origin == destination {
                return Err(DomainError::SameAccountTransfer);
            }
        }

        if self.amount() <= 0 {
            return Err(DomainError::InvalidAmount(format!(
                "{} amount must be positive (got {})",
                self.kind(),
                self.amount()
            )));
        }

        Ok(())
    }
}

impl TryFrom<EventRequest> for LedgerEvent {
    type Error = DomainError;

    fn try_from(request: EventRequest) -> Result<Self, Self::Error> {
        let EventRequest {
            kind,
            origin,
            destination,
            amount,
        } = request;

        let event = match kind.as_str() {
            "deposit" => LedgerEvent::Deposit {
                destination: destination.ok_or(DomainError::MissingField("destination"))?,
                amount,
            },
            "withdraw" => LedgerEvent::Withdraw {
                origin: origin.ok_or(DomainError::MissingField("origin"))?,
                amount,
            },
            "transfer" => LedgerEvent::Transfer {
                origin: origin.ok_or(DomainError::MissingField("origin"))?,
                destination: destination.ok_or(DomainError::MissingField("destination"))?,
                amount,
            },
            _ => return Err(DomainError::InvalidEventType(kind)),
        };

        event.validate()?;
        Ok(event)
    }
}

/// Account snapshots touched by a named event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Account>,
}
