//! Accounts: identifiers, usernames and the account service error.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Error, PasswordHash};

/// Maximum number of characters in a username.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validation failures for [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// Blank once trimmed.
    #[error("This field is required.")]
    Empty,
    /// Longer than [`USERNAME_MAX_CHARS`].
    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong {
        /// Limit.
        max: usize,
        /// Submitted length.
        actual: usize,
    },
    /// Contains a character outside letters, digits and `@.+-_`.
    #[error(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
    )]
    InvalidCharacters,
}

/// Login name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`USERNAME_MAX_CHARS`] characters.
/// - Only alphanumeric characters and `@`, `.`, `+`, `-`, `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::Username;
    ///
    /// assert!(Username::new("ada.lovelace+1").is_ok());
    /// assert!(Username::new("ada lovelace").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, UsernameError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(UsernameError::Empty);
        }
        let actual = value.chars().count();
        if actual > USERNAME_MAX_CHARS {
            return Err(UsernameError::TooLong {
                max: USERNAME_MAX_CHARS,
                actual,
            });
        }
        if !value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Identifier stored in the session.
    pub id: AccountId,
    /// Unique login name.
    pub username: Username,
    /// Current credential.
    pub password_hash: PasswordHash,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Failures reported by the account use-cases.
///
/// Every variant except [`AccountError::Unavailable`] is an expected outcome
/// that the form handlers show as a flash message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    /// Unknown username or wrong password; the two are indistinguishable.
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,
    /// No account has the submitted username.
    #[error("Username does not exist.")]
    UserNotFound,
    /// The two password entries differ.
    #[error("Passwords do not match.")]
    PasswordMismatch,
    /// The password breaks one or more strength rules.
    #[error("{}", .0.join(" "))]
    PolicyViolation(Vec<String>),
    /// Another account already uses the username.
    #[error("A user with that username already exists.")]
    UsernameTaken,
    /// The username is malformed.
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    /// Storage or hashing failed.
    #[error(transparent)]
    Unavailable(#[from] Error),
}

impl AccountError {
    /// Messages to show the user, one per line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::PolicyViolation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
