//! `AccountRepository` backed by a locked map keyed by username.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, PasswordHash, Username};

/// In-memory account store.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let mut accounts = self.accounts.write().await;
        let key = account.username.as_str();
        if accounts.contains_key(key) {
            return Err(AccountPersistenceError::duplicate_username(key));
        }
        accounts.insert(key.to_owned(), account.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(self.accounts.read().await.get(username.as_str()).cloned())
    }

    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountPersistenceError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| AccountPersistenceError::not_found(id.to_string()))?;
        account.password_hash = password_hash.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn account(name: &str) -> Account {
        Account {
            id: AccountId::random(),
            username: Username::new(name).expect("valid username"),
            password_hash: PasswordHash::generate("violet-harbour-42").expect("hash"),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(&account("ada")).await.expect("first insert");
        let err = repo
            .insert(&account("ada"))
            .await
            .expect_err("duplicate insert");
        assert_eq!(err, AccountPersistenceError::duplicate_username("ada"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_password_replaces_hash() {
        let repo = InMemoryAccountRepository::new();
        let stored = account("ada");
        repo.insert(&stored).await.expect("insert");

        let replacement = PasswordHash::generate("amber-lantern-77").expect("hash");
        repo.update_password(stored.id, &replacement)
            .await
            .expect("update");

        let reloaded = repo
            .find_by_username(&stored.username)
            .await
            .expect("lookup")
            .expect("account present");
        assert!(reloaded.password_hash.verify("amber-lantern-77"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_password_for_unknown_account_fails() {
        let repo = InMemoryAccountRepository::new();
        let replacement = PasswordHash::generate("amber-lantern-77").expect("hash");
        let err = repo
            .update_password(AccountId::random(), &replacement)
            .await
            .expect_err("unknown account");
        assert!(matches!(err, AccountPersistenceError::NotFound { .. }));
    }
}
