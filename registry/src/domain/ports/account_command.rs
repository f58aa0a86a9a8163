//! Driving port for registration and password reset.

use async_trait::async_trait;

use crate::domain::{Account, AccountError, PasswordChange};

/// Domain use-case port for account lifecycle changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account from a username and a confirmed password.
    async fn register(
        &self,
        username: &str,
        password: &PasswordChange,
    ) -> Result<Account, AccountError>;

    /// Replace the password of the account named `username`.
    ///
    /// No failure leaves the stored credential modified.
    async fn reset_password(
        &self,
        username: &str,
        password: &PasswordChange,
    ) -> Result<(), AccountError>;
}
