//! Account Service
//!
//! Account lifecycle: creation keyed by document number, balance and
//! overdraft queries, overdraft updates and administrative reset.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::domain::{Account, DomainError};
use crate::error::{AppError, AppResult};
use crate::store::{AccountStore, StoreError};

use super::{AccountRef, UNKNOWN_DOCUMENT};

/// Two-way document <-> account mapping
#[derive(Debug, Default)]
struct DocumentIndex {
    by_document: HashMap<String, String>,
    by_account: HashMap<String, String>,
}

impl DocumentIndex {
    fn insert(&mut self, document_number: &str, account_id: &str) {
        self.by_document
            .insert(document_number.to_string(), account_id.to_string());
        self.by_account
            .insert(account_id.to_string(), document_number.to_string());
    }

    fn clear(&mut self) {
        self.by_document.clear();
        self.by_account.clear();
    }
}

#[derive(Debug)]
pub struct AccountService {
    accounts: Arc<AccountStore>,
    documents: RwLock<DocumentIndex>,
}

impl AccountService {
    pub fn new(accounts: Arc<AccountStore>) -> Self {
        Self {
            accounts,
            documents: RwLock::new(DocumentIndex::default()),
        }
    }

    fn documents(&self) -> Result<RwLockReadGuard<'_, DocumentIndex>, StoreError> {
        self.documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("document"))
    }

    fn documents_mut(&self) -> Result<RwLockWriteGuard<'_, DocumentIndex>, StoreError> {
        self.documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("document"))
    }

    // =========================================================================
    // CreateAccount
    // =========================================================================

    /// Open an account for a document number.
    ///
    /// The document lock is held until both the account and the mapping
    /// exist, so no caller sees one without the other.
    pub fn create_account(&self, document_number: &str) -> AppResult<AccountRef> {
        let mut documents = self.documents_mut()?;

        if documents.by_document.contains_key(document_number) {
            tracing::warn!(document_number, "Document already has an account");
            return Err(DomainError::DuplicateDocument(document_number.to_string()).into());
        }

        // Event deposits may have created arbitrary ids already
        let account_id = loop {
            let candidate = Uuid::new_v4().to_string();
            if self.accounts.insert_new(Account::new(candidate.as_str()))? {
                break candidate;
            }
        };

        documents.insert(document_number, &account_id);

        tracing::debug!(account_id = %account_id, document_number, "Account created");
        Ok(AccountRef::new(account_id, document_number))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Account id with its document number, `UNKNOWN` when unmapped
    pub fn get_account(&self, account_id: &str) -> AppResult<AccountRef> {
        let account = self.find(account_id)?;

        let document_number = self
            .documents()?
            .by_account
            .get(account.id())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string());

        Ok(AccountRef::new(account.id(), document_number))
    }

    pub fn get_balance(&self, account_id: &str) -> AppResult<i64> {
        Ok(self.find(account_id)?.balance())
    }

    /// Full snapshot of one account
    pub fn find(&self, account_id: &str) -> AppResult<Account> {
        self.accounts
            .get(account_id)?
            .ok_or_else(|| DomainError::AccountNotFound(account_id.to_string()).into())
    }

    // =========================================================================
    // SetOverdraft
    // =========================================================================

    /// Replace the overdraft limit. Any value is accepted, negative included.
    pub fn set_overdraft_limit(&self, account_id: &str, limit: i64) -> AppResult<Account> {
        let account = self
            .accounts
            .update(account_id, |account| {
                account.set_overdraft_limit(limit);
                Ok::<_, AppError>(account.clone())
            })?
            .ok_or_else(|| DomainError::AccountNotFound(account_id.to_string()))?;

        tracing::debug!(account_id, limit, "Overdraft limit updated");
        Ok(account)
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Drop every account and document mapping
    pub fn reset(&self) -> AppResult<()> {
        let mut documents = self.documents_mut()?;
        self.accounts.reset()?;
        documents.clear();

        tracing::info!("Accounts reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AccountService {
        AccountService::new(Arc::new(AccountStore::new()))
    }

    #[test]
    fn test_create_account_starts_empty() {
        let service = service();
        let created = service.create_account("12345678900").unwrap();

        assert_eq!(created.document_number, "12345678900");
        assert!(Uuid::parse_str(&created.account_id).is_ok());

        let account = service.find(&created.account_id).unwrap();
        assert_eq!(account.balance(), 0);
        assert_eq!(account.overdraft_limit(), 0);
    }

    #[test]
    fn test_duplicate_document_is_rejected() {
        let service = service();
        let first = service.create_account("doc1").unwrap();

        let err = service.create_account("doc1").unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::DuplicateDocument(doc)) if doc == "doc1"
        ));

        let again = service.get_account(&first.account_id).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn test_get_account_unknown_document() {
        let accounts = Arc::new(AccountStore::new());
        accounts.upsert(Account::new("implicit")).unwrap();
        let service = AccountService::new(accounts);

        let found = service.get_account("implicit").unwrap();
        assert_eq!(found.document_number, UNKNOWN_DOCUMENT);
        assert!(found.is_unknown_document());
    }

    #[test]
    fn test_missing_account_errors() {
        let service = service();

        for err in [
            service.get_account("ghost").unwrap_err(),
            service.get_balance("ghost").unwrap_err(),
            service.set_overdraft_limit("ghost", 10).unwrap_err(),
        ] {
            assert!(matches!(err.domain(), Some(DomainError::AccountNotFound(id)) if id == "ghost"));
        }
    }

    #[test]
    fn test_set_overdraft_accepts_negative() {
        let service = service();
        let created = service.create_account("doc").unwrap();

        let account = service.set_overdraft_limit(&created.account_id, -5).unwrap();
        assert_eq!(account.overdraft_limit(), -5);
    }

    #[test]
    fn test_reset_clears_accounts_and_documents() {
        let service = service();
        let created = service.create_account("doc").unwrap();

        service.reset().unwrap();

        assert!(service.get_account(&created.account_id).is_err());
        // The document is free again
        assert!(service.create_account("doc").is_ok());
    }
}
