//! Password strength rules applied on registration and reset.
//!
//! Every failing rule contributes one message; callers show them all.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Similarity ratio at or above which a password counts as derived from the
/// username.
const MAX_SIMILARITY: f64 = 0.7;

/// Lowercase, one password per line.
const COMMON_PASSWORDS: &str = include_str!("common_passwords.txt");

static COMMON_PASSWORD_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn common_passwords() -> &'static HashSet<&'static str> {
    COMMON_PASSWORD_SET.get_or_init(|| {
        COMMON_PASSWORDS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    })
}

/// Rule set checked against a candidate password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Messages for every rule `password` breaks; empty when acceptable.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::PasswordPolicy;
    ///
    /// let problems = PasswordPolicy.violations("1234", "ada");
    /// assert_eq!(problems.len(), 3);
    /// assert!(PasswordPolicy.violations("violet-harbour-42", "ada").is_empty());
    /// ```
    pub fn violations(&self, password: &str, username: &str) -> Vec<String> {
        let mut messages = Vec::new();
        if too_similar(password, username) {
            messages.push("The password is too similar to the username.".to_owned());
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            messages.push(format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_CHARS} characters."
            ));
        }
        let lowered = password.trim().to_lowercase();
        if common_passwords().contains(lowered.as_str()) {
            messages.push("This password is too common.".to_owned());
        }
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            messages.push("This password is entirely numeric.".to_owned());
        }
        messages
    }
}

/// Compare the password with the username and each of its word parts.
fn too_similar(password: &str, username: &str) -> bool {
    let password = password.to_lowercase();
    let username = username.trim().to_lowercase();
    if username.is_empty() || length_ratio_exceeded(&password, &username) {
        return false;
    }
    username
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|part| !part.is_empty())
        .chain(std::iter::once(username.as_str()))
        .any(|part| quick_ratio(&password, part) >= MAX_SIMILARITY)
}

/// A much longer password cannot be considered derived from a short name.
#[expect(
    clippy::cast_precision_loss,
    reason = "lengths of form inputs are far below f64 precision limits"
)]
fn length_ratio_exceeded(password: &str, value: &str) -> bool {
    let password_len = password.chars().count();
    let value_len = value.chars().count();
    let bound = MAX_SIMILARITY / 2.0 * password_len as f64;
    password_len >= 10 * value_len && (value_len as f64) < bound
}

/// Upper bound on sequence similarity from shared character counts:
/// `2 * shared / (len(a) + len(b))`.
#[expect(
    clippy::cast_precision_loss,
    reason = "lengths of form inputs are far below f64 precision limits"
)]
fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }
    let mut shared = 0_usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c).filter(|count| **count > 0) {
            *count -= 1;
            shared += 1;
        }
    }
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    2.0 * shared as f64 / total as f64
}
