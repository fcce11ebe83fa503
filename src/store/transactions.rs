//! Transaction Log
//!
//! Append-only sequence of committed transactions. Queries scan the whole
//! sequence and return snapshots in insertion order.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{OperationType, Transaction, TransactionId};

use super::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct TransactionLog {
    transactions: RwLock<Vec<Transaction>>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Transaction>>> {
        self.transactions
            .read()
            .map_err(|_| StoreError::LockPoisoned("transaction"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Transaction>>> {
        self.transactions
            .write()
            .map_err(|_| StoreError::LockPoisoned("transaction"))
    }

    fn filter<P>(&self, predicate: P) -> StoreResult<Vec<Transaction>>
    where
        P: Fn(&Transaction) -> bool,
    {
        Ok(self
            .read()?
            .iter()
            .filter(|tx| predicate(tx))
            .cloned()
            .collect())
    }

    pub fn append(&self, transaction: Transaction) -> StoreResult<Transaction> {
        self.write()?.push(transaction.clone());
        Ok(transaction)
    }

    pub fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        Ok(self
            .read()?
            .iter()
            .find(|tx| tx.transaction_id() == id)
            .cloned())
    }

    pub fn find_by_type(&self, operation_type: OperationType) -> StoreResult<Vec<Transaction>> {
        self.filter(|tx| tx.operation_type() == operation_type)
    }

    /// `begin <= event_date <= end`
    pub fn find_between(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Transaction>> {
        self.filter(|tx| tx.occurred_between(begin, end))
    }

    pub fn find_on_date(&self, date: NaiveDate) -> StoreResult<Vec<Transaction>> {
        self.filter(|tx| tx.occurred_on(date))
    }

    pub fn find_all(&self) -> StoreResult<Vec<Transaction>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn reset(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn seeded() -> TransactionLog {
        let log = TransactionLog::new();
        log.append(Transaction::new(1, "a", OperationType::Credit, 100, at(1, 9)))
            .unwrap();
        log.append(Transaction::new(2, "a", OperationType::Purchase, -20, at(1, 18)))
            .unwrap();
        log.append(Transaction::new(3, "b", OperationType::Credit, 50, at(2, 8)))
            .unwrap();
        log.append(Transaction::new(4, "b", OperationType::Withdrawal, -10, at(3, 12)))
            .unwrap();
        log
    }

    fn ids(transactions: &[Transaction]) -> Vec<TransactionId> {
        transactions.iter().map(Transaction::transaction_id).collect()
    }

    #[test]
    fn test_find_by_id() {
        let log = seeded();

        assert_eq!(log.find_by_id(3).unwrap().unwrap().account_id(), "b");
        assert_eq!(log.find_by_id(99).unwrap(), None);
    }

    #[test]
    fn test_find_by_type_keeps_insertion_order() {
        let log = seeded();

        assert_eq!(ids(&log.find_by_type(OperationType::Credit).unwrap()), vec![1, 3]);
        assert!(log
            .find_by_type(OperationType::SecondaryWithdrawal)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_find_between_includes_boundaries() {
        let log = seeded();

        let found = log.find_between(at(1, 18), at(2, 8)).unwrap();
        assert_eq!(ids(&found), vec![2, 3]);

        let found = log
            .find_between(at(1, 18) + Duration::seconds(1), at(2, 8) - Duration::seconds(1))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_on_date() {
        let log = seeded();

        assert_eq!(ids(&log.find_on_date(at(1, 0).date_naive()).unwrap()), vec![1, 2]);
        assert!(log.find_on_date(at(9, 0).date_naive()).unwrap().is_empty());
    }

    #[test]
    fn test_find_all_and_reset() {
        let log = seeded();
        assert_eq!(ids(&log.find_all().unwrap()), vec![1, 2, 3, 4]);
        assert_eq!(log.len().unwrap(), 4);

        log.reset().unwrap();
        assert!(log.is_empty().unwrap());
        assert!(log.find_all().unwrap().is_empty());
    }
}
