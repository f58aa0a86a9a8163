//! Credential primitives: login input, password changes and stored hashes.
//!
//! Plaintext passwords only live inside [`Zeroizing`] buffers and are wiped
//! when the value is dropped.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Domain error returned when login or password form values are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use registry::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter22").expect("valid input");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A new password entered twice, as on registration and reset forms.
///
/// Equality of the two entries is checked by the account service so that a
/// mismatch is reported as its own error.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    password: Zeroizing<String>,
    confirmation: Zeroizing<String>,
}

impl PasswordChange {
    /// Wrap both entries.
    pub fn new(password: &str, confirmation: &str) -> Self {
        Self {
            password: Zeroizing::new(password.to_owned()),
            confirmation: Zeroizing::new(confirmation.to_owned()),
        }
    }

    /// First entry.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether both entries are identical.
    pub fn confirmed(&self) -> bool {
        *self.password == *self.confirmation
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Raised when hashing fails or a stored hash cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl From<password_hash::Error> for PasswordHashError {
    fn from(value: password_hash::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::PasswordHash;
    ///
    /// let hash = PasswordHash::generate("correct horse").expect("hashing succeeds");
    /// assert!(hash.verify("correct horse"));
    /// assert!(!hash.verify("wrong horse"));
    /// ```
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a stored PHC string after checking that it parses.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        password_hash::PasswordHash::new(&phc)?;
        Ok(Self(phc))
    }

    /// Whether `password` matches this hash.
    pub fn verify(&self, password: &str) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }

    /// PHC string for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
