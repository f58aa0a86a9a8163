//! Student records: identifiers, validated field values and the entity.
//!
//! Handlers never build these types directly from form input. They go
//! through [`StudentPayload::validate`], which collects every field error in
//! one pass so the form can be redisplayed with all problems marked.

mod filter;
mod validation;

use std::fmt;

use chrono::{Datelike, NaiveDate};

pub use self::filter::StudentFilter;
pub use self::validation::{
    EmailStatus, FieldErrorKind, StudentField, StudentFieldError, StudentPayload,
    StudentValidationErrors,
};

/// Maximum number of characters in a first or last name.
pub const NAME_MAX_CHARS: usize = 50;
/// Maximum number of characters in an email address.
pub const EMAIL_MAX_CHARS: usize = 254;

/// Raised when an identifier is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("student id must be positive, got {0}")]
pub struct InvalidStudentId(pub i64);

/// System-assigned student identifier.
///
/// ## Invariants
/// - Always strictly positive; storage assigns identifiers from a sequence
///   starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId(i64);

impl StudentId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i64) -> Result<Self, InvalidStudentId> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidStudentId(value))
        }
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for StudentId {
    type Error = InvalidStudentId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Raised when a grade falls outside the school range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grade must be between {min} and {max}, got {value}", min = Grade::MIN, max = Grade::MAX)]
pub struct GradeOutOfRange {
    /// Rejected value.
    pub value: i64,
}

/// School grade, `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Grade(u8);

impl Grade {
    /// Lowest accepted grade.
    pub const MIN: u8 = 1;
    /// Highest accepted grade.
    pub const MAX: u8 = 12;

    /// Validate a grade value.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::Grade;
    ///
    /// assert!(Grade::new(12).is_ok());
    /// assert!(Grade::new(13).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, GradeOutOfRange> {
        u8::try_from(value)
            .ok()
            .filter(|grade| (Self::MIN..=Self::MAX).contains(grade))
            .map(Self)
            .ok_or(GradeOutOfRange { value })
    }

    /// Raw grade value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Well-formed email address.
///
/// ## Invariants
/// - Trimmed, no inner whitespace, at most [`EMAIL_MAX_CHARS`] characters.
/// - Contains `@` with a non-empty part on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address, returning `None` when it is malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.chars().count() > EMAIL_MAX_CHARS || value.chars().any(char::is_whitespace) {
            return None;
        }
        let (local, domain) = value.rsplit_once('@')?;
        if local.is_empty() || domain.is_empty() {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First or last name: trimmed, non-empty, at most [`NAME_MAX_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Parse a name, returning `None` when blank or too long.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.is_empty() || value.chars().count() > NAME_MAX_CHARS {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully validated student fields without an identifier.
///
/// Produced by [`StudentPayload::validate`] and consumed by the record store
/// for both inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Unique contact address.
    pub email: EmailAddress,
    /// Birth date.
    pub date_of_birth: NaiveDate,
    /// Date the student enrolled; drives listing filters and analytics.
    pub enrollment_date: NaiveDate,
    /// Current grade.
    pub grade: Grade,
}

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    fields: StudentDraft,
}

impl Student {
    /// Attach a storage-assigned identifier to validated fields.
    pub fn new(id: StudentId, fields: StudentDraft) -> Self {
        Self { id, fields }
    }

    /// Storage identifier.
    pub fn id(&self) -> StudentId {
        self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &PersonName {
        &self.fields.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &PersonName {
        &self.fields.last_name
    }

    /// `"{first} {last}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fields.first_name, self.fields.last_name)
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.fields.email
    }

    /// Birth date.
    pub fn date_of_birth(&self) -> NaiveDate {
        self.fields.date_of_birth
    }

    /// Enrollment date.
    pub fn enrollment_date(&self) -> NaiveDate {
        self.fields.enrollment_date
    }

    /// Calendar year of enrollment.
    pub fn enrollment_year(&self) -> i32 {
        self.fields.enrollment_date.year()
    }

    /// Current grade.
    pub fn grade(&self) -> Grade {
        self.fields.grade
    }

    /// Borrow the validated fields.
    pub fn fields(&self) -> &StudentDraft {
        &self.fields
    }
}
