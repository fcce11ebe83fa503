//! Account Store
//!
//! Accounts keyed by id behind a single reader/writer lock. Reads may run
//! together; any write excludes every other read and write.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::Account;

use super::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .read()
            .map_err(|_| StoreError::LockPoisoned("account"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .write()
            .map_err(|_| StoreError::LockPoisoned("account"))
    }

    // =========================================================================
    // Plain access
    // =========================================================================

    /// Snapshot of the account as of the latest committed write
    pub fn get(&self, id: &str) -> StoreResult<Option<Account>> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    /// Insert or replace, last writer wins
    pub fn upsert(&self, account: Account) -> StoreResult<Account> {
        self.write()?
            .insert(account.id().to_string(), account.clone());
        Ok(account)
    }

    /// Insert only when the id is free; returns whether it was inserted
    pub fn insert_new(&self, account: Account) -> StoreResult<bool> {
        let mut accounts = self.write()?;
        if accounts.contains_key(account.id()) {
            return Ok(false);
        }
        accounts.insert(account.id().to_string(), account);
        Ok(true)
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Snapshot of every account, in no particular order
    pub fn all(&self) -> StoreResult<Vec<Account>> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub fn reset(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    // =========================================================================
    // Atomic read-check-write
    // =========================================================================
    //
    // Closures run against a copy while the write lock is held. The copy is
    // committed only when the closure succeeds, so a rejected operation
    // leaves the store untouched.

    /// Mutate an existing account. `Ok(None)` when the id is unknown.
    pub fn update<T, E, F>(&self, id: &str, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Account) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut accounts = self.write()?;
        let Some(current) = accounts.get(id) else {
            return Ok(None);
        };

        let mut next = current.clone();
        let output = f(&mut next)?;
        accounts.insert(id.to_string(), next);
        Ok(Some(output))
    }

    /// Mutate an account, starting from an empty one when the id is unknown
    pub fn update_or_create<T, E, F>(&self, id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Account) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut accounts = self.write()?;
        let mut next = accounts
            .get(id)
            .cloned()
            .unwrap_or_else(|| Account::new(id));

        let output = f(&mut next)?;
        accounts.insert(id.to_string(), next);
        Ok(output)
    }

    /// Mutate two distinct accounts under one write lock.
    ///
    /// `origin` must exist (`Ok(None)` otherwise); `destination` starts
    /// empty when unknown. Both records are committed together or not at all.
    /// The same id on both sides fails with `StoreError::SameRecord`.
    pub fn update_pair<T, E, F>(&self, origin: &str, destination: &str, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<T, E>,
        E: From<StoreError>,
    {
        if origin == destination {
            return Err(StoreError::SameRecord(origin.to_string()).into());
        }

        let mut accounts = self.write()?;
        let Some(current_origin) = accounts.get(origin) else {
            return Ok(None);
        };

        let mut next_origin = current_origin.clone();
        let mut next_destination = accounts
            .get(destination)
            .cloned()
            .unwrap_or_else(|| Account::new(destination));

        let output = f(&mut next_origin, &mut next_destination)?;
        accounts.insert(origin.to_string(), next_origin);
        accounts.insert(destination.to_string(), next_destination);
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Store(StoreError),
        Domain(DomainError),
    }

    impl From<StoreError> for TestError {
        fn from(e: StoreError) -> Self {
            TestError::Store(e)
        }
    }

    impl From<DomainError> for TestError {
        fn from(e: DomainError) -> Self {
            TestError::Domain(e)
        }
    }

    fn funded(id: &str, balance: i64) -> Account {
        let mut account = Account::new(id);
        account.credit(balance).unwrap();
        account
    }

    #[test]
    fn test_get_and_upsert() {
        let store = AccountStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.upsert(funded("a", 10)).unwrap();
        store.upsert(funded("a", 25)).unwrap();

        assert_eq!(store.get("a").unwrap().unwrap().balance(), 25);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_insert_new_keeps_existing() {
        let store = AccountStore::new();
        assert!(store.insert_new(funded("a", 10)).unwrap());
        assert!(!store.insert_new(Account::new("a")).unwrap());

        assert_eq!(store.get("a").unwrap().unwrap().balance(), 10);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = AccountStore::new();
        store.upsert(Account::new("a")).unwrap();
        store.upsert(Account::new("b")).unwrap();

        store.reset().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_update_missing_account() {
        let store = AccountStore::new();
        let result: Result<Option<()>, TestError> = store.update("nope", |_| Ok(()));

        assert_eq!(result, Ok(None));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_failed_update_leaves_account_untouched() {
        let store = AccountStore::new();
        store.upsert(funded("a", 10)).unwrap();

        let result: Result<Option<()>, TestError> = store.update("a", |account| {
            account.set_overdraft_limit(99);
            account.debit(500)?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(TestError::Domain(DomainError::InsufficientFunds { .. }))
        ));
        let account = store.get("a").unwrap().unwrap();
        assert_eq!(account.balance(), 10);
        assert_eq!(account.overdraft_limit(), 0);
    }

    #[test]
    fn test_update_or_create_creates_empty_account() {
        let store = AccountStore::new();
        let balance: Result<i64, TestError> = store.update_or_create("new", |account| {
            account.credit(500)?;
            Ok(account.balance())
        });

        assert_eq!(balance, Ok(500));
        assert_eq!(store.get("new").unwrap().unwrap().balance(), 500);
    }

    #[test]
    fn test_update_pair_commits_both_or_neither() {
        let store = AccountStore::new();
        store.upsert(funded("a", 100)).unwrap();

        let failed: Result<Option<()>, TestError> = store.update_pair("a", "b", |origin, dest| {
            dest.credit(150)?;
            origin.debit(150)?;
            Ok(())
        });
        assert!(failed.is_err());
        assert_eq!(store.get("a").unwrap().unwrap().balance(), 100);
        assert_eq!(store.get("b").unwrap(), None);

        let moved: Result<Option<()>, TestError> = store.update_pair("a", "b", |origin, dest| {
            origin.debit(100)?;
            dest.credit(100)?;
            Ok(())
        });
        assert_eq!(moved, Ok(Some(())));
        assert_eq!(store.get("a").unwrap().unwrap().balance(), 0);
        assert_eq!(store.get("b").unwrap().unwrap().balance(), 100);
    }

    #[test]
    fn test_update_pair_rejects_same_record() {
        let store = AccountStore::new();
        store.upsert(funded("a", 100)).unwrap();

        let result: Result<Option<()>, TestError> = store.update_pair("a", "a", |origin, dest| {
            origin.debit(50)?;
            dest.credit(50)?;
            Ok(())
        });

        assert_eq!(result, Err(TestError::Store(StoreError::SameRecord("a".to_string()))));
        assert_eq!(store.get("a").unwrap().unwrap().balance(), 100);
    }

    #[test]
    fn test_update_pair_requires_origin() {
        let store = AccountStore::new();
        let result: Result<Option<()>, TestError> = store.update_pair("a", "b", |_, _| Ok(()));

        assert_eq!(result, Ok(None));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = AccountStore::new();
        store.upsert(Account::new("a")).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        let _: Result<Option<()>, TestError> =
                            store.update("a", |account| Ok(account.credit(1)?));
                    }
                });
            }
        });

        assert_eq!(store.get("a").unwrap().unwrap().balance(), 2000);
    }
}
