//! Transaction Service
//!
//! Balance-changing operations and transaction queries.
//!
//! Two paths exist and stay separate: typed transactions are normalized by
//! operation type and recorded in the transaction log; named events
//! (deposit, withdraw, transfer) move raw amounts and return account
//! snapshots without logging anything.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    Account, DomainError, EventOutcome, EventRequest, LedgerEvent, OperationType, Transaction,
    TransactionId,
};
use crate::error::{AppError, AppResult};
use crate::store::{AccountStore, TransactionIdGenerator, TransactionLog};

use super::CreateTransactionCommand;

#[derive(Debug)]
pub struct TransactionService {
    accounts: Arc<AccountStore>,
    transactions: Arc<TransactionLog>,
    ids: Arc<TransactionIdGenerator>,
}

impl TransactionService {
    pub fn new(
        accounts: Arc<AccountStore>,
        transactions: Arc<TransactionLog>,
        ids: Arc<TransactionIdGenerator>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            ids,
        }
    }

    // =========================================================================
    // Typed transactions
    // =========================================================================

    /// Apply a typed transaction and append it to the log.
    ///
    /// The account is looked up first, so an unknown account is reported
    /// as `AccountNotFound` whatever the code or amount. The funds check,
    /// balance write, id allocation and log append then run as one critical
    /// section under the account store's write lock. Locks are always taken
    /// account store first, transaction log second.
    ///
    /// # Panics
    /// When `operation_type_id` is outside `1..=4` for an existing account.
    /// Callers validate codes coming from outside the process before
    /// reaching this point.
    pub fn create_transaction(&self, command: CreateTransactionCommand) -> AppResult<Transaction> {
        let CreateTransactionCommand {
            account_id,
            operation_type_id,
            amount,
        } = command;

        if !self.accounts.contains(&account_id)? {
            return Err(DomainError::AccountNotFound(account_id).into());
        }

        let operation_type = match OperationType::from_code(operation_type_id) {
            Some(op) => op,
            None => panic!("operation type {operation_type_id} doesn't exist"),
        };

        if amount <= 0 {
            return Err(DomainError::InvalidAmount(format!(
                "transaction amount must be positive (got {amount})"
            ))
            .into());
        }

        let signed = operation_type.normalize(amount);

        // A failed append fails the closure, so the balance change is dropped too
        let transaction = self
            .accounts
            .update(&account_id, |account| {
                if signed < 0 {
                    account.ensure_available(-signed)?;
                }
                account.adjust(signed)?;

                let transaction = self.transactions.append(Transaction::new(
                    self.ids.next(),
                    account.id(),
                    operation_type,
                    signed,
                    Utc::now(),
                ))?;
                Ok::<_, AppError>(transaction)
            })
            .inspect_err(|e| {
                tracing::warn!(account_id = %account_id, amount = signed, error = %e, "Transaction rejected")
            })?
            .ok_or_else(|| DomainError::AccountNotFound(account_id.clone()))?;

        tracing::debug!(
            transaction_id = transaction.transaction_id(),
            account_id = %transaction.account_id(),
            operation_type_id,
            amount = signed,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    // =========================================================================
    // Named events
    // =========================================================================

    /// Validate a raw event request and apply it
    pub fn handle_transaction(&self, request: EventRequest) -> AppResult<EventOutcome> {
        let event = LedgerEvent::try_from(request)?;
        self.handle_event(event)
    }

    /// Apply a named event. Events are re-validated here, so hand-built
    /// variants get the same checks as parsed requests.
    pub fn handle_event(&self, event: LedgerEvent) -> AppResult<EventOutcome> {
        let kind = event.kind();
        let amount = event.amount();

        let outcome = match event.validate() {
            Ok(()) => self.apply_event(event),
            Err(e) => Err(e.into()),
        };

        match &outcome {
            Ok(_) => tracing::debug!(kind, amount, "Event applied"),
            Err(e) => tracing::warn!(kind, amount, error = %e, "Event rejected"),
        }

        outcome
    }

    fn apply_event(&self, event: LedgerEvent) -> AppResult<EventOutcome> {
        match event {
            LedgerEvent::Deposit {
                destination,
                amount,
            } => self.deposit(&destination, amount).map(|destination| EventOutcome {
                origin: None,
                destination: Some(destination),
            }),
            LedgerEvent::Withdraw { origin, amount } => {
                self.withdraw(&origin, amount).map(|origin| EventOutcome {
                    origin: Some(origin),
                    destination: None,
                })
            }
            LedgerEvent::Transfer {
                origin,
                destination,
                amount,
            } => self
                .transfer(&origin, &destination, amount)
                .map(|(origin, destination)| EventOutcome {
                    origin: Some(origin),
                    destination: Some(destination),
                }),
        }
    }

    /// Credit `destination`, creating it when unknown. Never consults overdraft.
    fn deposit(&self, destination: &str, amount: i64) -> AppResult<Account> {
        self.accounts.update_or_create(destination, |account| {
            account.credit(amount)?;
            Ok::<_, AppError>(account.clone())
        })
    }

    fn withdraw(&self, origin: &str, amount: i64) -> AppResult<Account> {
        self.accounts
            .update(origin, |account| {
                account.debit(amount)?;
                Ok::<_, AppError>(account.clone())
            })?
            .ok_or_else(|| DomainError::AccountNotFound(origin.to_string()).into())
    }

    /// Move `amount` between two accounts in one critical section.
    /// A missing destination is created empty; a missing origin fails.
    fn transfer(&self, origin: &str, destination: &str, amount: i64) -> AppResult<(Account, Account)> {
        self.accounts
            .update_pair(origin, destination, |from, to| {
                from.debit(amount)?;
                to.credit(amount)?;
                Ok::<_, AppError>((from.clone(), to.clone()))
            })?
            .ok_or_else(|| DomainError::AccountNotFound(origin.to_string()).into())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_transaction_by_id(&self, transaction_id: TransactionId) -> AppResult<Transaction> {
        self.transactions
            .find_by_id(transaction_id)?
            .ok_or_else(|| DomainError::TransactionNotFound(transaction_id).into())
    }

    /// Transactions whose event date is today (UTC)
    pub fn get_transactions_today(&self) -> AppResult<Vec<Transaction>> {
        Ok(self.transactions.find_on_date(Utc::now().date_naive())?)
    }

    /// Inclusive range on both ends
    pub fn get_transactions_in_range(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Transaction>> {
        Ok(self.transactions.find_between(begin, end)?)
    }

    /// Empty for codes outside `1..=4`, never an error
    pub fn get_transactions_by_type(&self, operation_type_id: i32) -> AppResult<Vec<Transaction>> {
        match OperationType::from_code(operation_type_id) {
            Some(operation_type) => Ok(self.transactions.find_by_type(operation_type)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_all_transactions(&self) -> AppResult<Vec<Transaction>> {
        Ok(self.transactions.find_all()?)
    }

    /// Clear the log. Issued ids are never handed out again.
    pub fn reset(&self) -> AppResult<()> {
        self.transactions.reset()?;
        tracing::info!(last_issued = self.ids.last_issued(), "Transactions reset");
        Ok(())
    }
}
