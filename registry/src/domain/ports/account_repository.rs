//! Driven port for account storage.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, PasswordHash, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username {username} is already registered",
        /// No account has the requested identifier.
        NotFound { id: String } => "account {id} not found",
    }
}

/// Port for reading and writing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError>;

    /// Fetch an account by its exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Overwrite the stored credential.
    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountPersistenceError>;
}
