//! Account services: registration, login and password reset.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, AccountPersistenceError, AccountRepository, LoginService,
};
use crate::domain::{
    Account, AccountError, AccountId, Error, LoginCredentials, PasswordChange, PasswordHash,
    PasswordPolicy, Username,
};

/// Account service implementing the login and account driving ports.
#[derive(Clone)]
pub struct AccountService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: PasswordPolicy,
}

impl<R> AccountService<R> {
    /// Create a new service over the given account store; `clock` stamps
    /// registrations.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            policy: PasswordPolicy,
        }
    }
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    fn map_persistence_error(error: AccountPersistenceError) -> AccountError {
        match error {
            AccountPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
                    .into()
            }
            AccountPersistenceError::Query { message } => {
                Error::internal(format!("account repository error: {message}")).into()
            }
            AccountPersistenceError::DuplicateUsername { .. } => AccountError::UsernameTaken,
            AccountPersistenceError::NotFound { .. } => AccountError::UserNotFound,
        }
    }

    /// Mismatch is reported before strength so the user fixes typos first.
    fn check_new_password(
        &self,
        password: &PasswordChange,
        username: &Username,
    ) -> Result<PasswordHash, AccountError> {
        if !password.confirmed() {
            return Err(AccountError::PasswordMismatch);
        }
        let violations = self.policy.violations(password.password(), username.as_str());
        if !violations.is_empty() {
            return Err(AccountError::PolicyViolation(violations));
        }
        PasswordHash::generate(password.password())
            .map_err(|err| Error::internal(err.to_string()).into())
    }

    async fn lookup(&self, username: &Username) -> Result<Option<Account>, AccountError> {
        self.repository
            .find_by_username(username)
            .await
            .map_err(Self::map_persistence_error)
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: AccountRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AccountId, AccountError> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(AccountError::InvalidCredentials);
        };
        match self.lookup(&username).await? {
            Some(account) if account.password_hash.verify(credentials.password()) => {
                info!(account_id = %account.id, "login succeeded");
                Ok(account.id)
            }
            _ => Err(AccountError::InvalidCredentials),
        }
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(
        &self,
        username: &str,
        password: &PasswordChange,
    ) -> Result<Account, AccountError> {
        let username = Username::new(username)?;
        if self.lookup(&username).await?.is_some() {
            return Err(AccountError::UsernameTaken);
        }
        let password_hash = self.check_new_password(password, &username)?;
        let account = Account {
            id: AccountId::random(),
            username,
            password_hash,
            created_at: self.clock.utc(),
        };
        self.repository
            .insert(&account)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    async fn reset_password(
        &self,
        username: &str,
        password: &PasswordChange,
    ) -> Result<(), AccountError> {
        let Ok(username) = Username::new(username) else {
            return Err(AccountError::UserNotFound);
        };
        let account = self
            .lookup(&username)
            .await?
            .ok_or(AccountError::UserNotFound)?;
        let password_hash = self.check_new_password(password, &account.username)?;
        self.repository
            .update_password(account.id, &password_hash)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(account_id = %account.id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
