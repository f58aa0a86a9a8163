//! Driving port for login.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing store, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{AccountError, AccountId, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account id.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AccountError::InvalidCredentials`].
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountId, AccountError>;
}
