//! Field-level validation for student form submissions.

use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{
    EMAIL_MAX_CHARS, EmailAddress, Grade, NAME_MAX_CHARS, PersonName, Student, StudentDraft,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form fields of a student record, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StudentField {
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `email`
    Email,
    /// `date_of_birth`
    DateOfBirth,
    /// `enrollment_date`
    EnrollmentDate,
    /// `grade`
    Grade,
}

impl StudentField {
    /// Every field in display order.
    pub const ALL: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::DateOfBirth,
        Self::EnrollmentDate,
        Self::Grade,
    ];

    /// Form parameter name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::DateOfBirth => "date_of_birth",
            Self::EnrollmentDate => "enrollment_date",
            Self::Grade => "grade",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::DateOfBirth => "Date of birth",
            Self::EnrollmentDate => "Enrollment date",
            Self::Grade => "Grade",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    /// Required value absent or blank.
    MissingField,
    /// Value present but malformed.
    InvalidFormat,
    /// Another student already uses this email.
    DuplicateEmail,
    /// Grade outside `1..=12`.
    OutOfRange,
}

/// One failed rule, scoped to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFieldError {
    field: StudentField,
    kind: FieldErrorKind,
    message: String,
}

impl StudentFieldError {
    fn new(field: StudentField, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    fn missing(field: StudentField) -> Self {
        Self::new(field, FieldErrorKind::MissingField, "This field is required.")
    }

    fn too_long(field: StudentField, max: usize, actual: usize) -> Self {
        Self::new(
            field,
            FieldErrorKind::InvalidFormat,
            format!("Ensure this value has at most {max} characters (it has {actual})."),
        )
    }

    /// Error reported when another record holds the submitted email.
    pub fn duplicate_email() -> Self {
        Self::new(
            StudentField::Email,
            FieldErrorKind::DuplicateEmail,
            "A student with this email already exists.",
        )
    }

    /// Field the error belongs to.
    pub fn field(&self) -> StudentField {
        self.field
    }

    /// Failure category.
    pub fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Non-empty collection of field errors, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("student form has {} invalid field(s)", .0.len())]
pub struct StudentValidationErrors(Vec<StudentFieldError>);

impl StudentValidationErrors {
    /// Wrap a single error.
    pub fn single(error: StudentFieldError) -> Self {
        Self(vec![error])
    }

    /// All errors in field order.
    pub fn errors(&self) -> &[StudentFieldError] {
        &self.0
    }

    /// Errors attached to `field`.
    pub fn for_field(&self, field: StudentField) -> impl Iterator<Item = &StudentFieldError> {
        self.0.iter().filter(move |error| error.field == field)
    }

    /// Whether `field` failed with `kind`.
    pub fn contains(&self, field: StudentField, kind: FieldErrorKind) -> bool {
        self.for_field(field).any(|error| error.kind == kind)
    }
}

/// Whether the submitted email already belongs to another record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    /// No other record uses it, or it was not checked.
    Available,
    /// Another record uses it.
    Taken,
}

/// Raw student form submission.
///
/// Every field is optional text, exactly as an HTML form posts it. The same
/// type pre-fills the edit form via [`StudentPayload::from_student`] and
/// echoes rejected input back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPayload {
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub enrollment_date: Option<String>,
    /// Whole number in `1..=12`.
    #[serde(default)]
    pub grade: Option<String>,
}

impl StudentPayload {
    /// Payload mirroring a stored record, for edit forms.
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: Some(student.first_name().to_string()),
            last_name: Some(student.last_name().to_string()),
            email: Some(student.email().to_string()),
            date_of_birth: Some(student.date_of_birth().format(DATE_FORMAT).to_string()),
            enrollment_date: Some(student.enrollment_date().format(DATE_FORMAT).to_string()),
            grade: Some(student.grade().to_string()),
        }
    }

    /// Submitted value for `field`, if any.
    pub fn value(&self, field: StudentField) -> Option<&str> {
        match field {
            StudentField::FirstName => self.first_name.as_deref(),
            StudentField::LastName => self.last_name.as_deref(),
            StudentField::Email => self.email.as_deref(),
            StudentField::DateOfBirth => self.date_of_birth.as_deref(),
            StudentField::EnrollmentDate => self.enrollment_date.as_deref(),
            StudentField::Grade => self.grade.as_deref(),
        }
    }

    /// Well-formed email from the submission, used for the duplicate check.
    ///
    /// Returns `None` for missing or malformed input, so format problems are
    /// always reported before uniqueness is considered.
    pub fn well_formed_email(&self) -> Option<EmailAddress> {
        self.email.as_deref().and_then(EmailAddress::parse)
    }

    /// Validate every field, collecting all failures.
    ///
    /// `email_status` carries the result of the uniqueness lookup; it is
    /// only consulted when the email itself is well formed.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::{EmailStatus, StudentPayload};
    ///
    /// let payload = StudentPayload {
    ///     first_name: Some("Ada".into()),
    ///     last_name: Some("Lovelace".into()),
    ///     email: Some("ada@example.com".into()),
    ///     date_of_birth: Some("2010-12-10".into()),
    ///     enrollment_date: Some("2023-09-01".into()),
    ///     grade: Some("7".into()),
    /// };
    /// let draft = payload.validate(EmailStatus::Available).expect("valid payload");
    /// assert_eq!(draft.grade.get(), 7);
    /// ```
    pub fn validate(
        &self,
        email_status: EmailStatus,
    ) -> Result<StudentDraft, StudentValidationErrors> {
        use StudentField as F;

        let mut errors = Vec::new();
        let first_name = collect(&mut errors, parse_name(F::FirstName, self.value(F::FirstName)));
        let last_name = collect(&mut errors, parse_name(F::LastName, self.value(F::LastName)));
        let email = collect(&mut errors, parse_email(self.value(F::Email), email_status));
        let date_of_birth =
            collect(&mut errors, parse_date(F::DateOfBirth, self.value(F::DateOfBirth)));
        let enrollment_date = collect(
            &mut errors,
            parse_date(F::EnrollmentDate, self.value(F::EnrollmentDate)),
        );
        let grade = collect(&mut errors, parse_grade(self.value(F::Grade)));

        match (first_name, last_name, email, date_of_birth, enrollment_date, grade) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(date_of_birth),
                Some(enrollment_date),
                Some(grade),
            ) => Ok(StudentDraft {
                first_name,
                last_name,
                email,
                date_of_birth,
                enrollment_date,
                grade,
            }),
            _ => Err(StudentValidationErrors(errors)),
        }
    }
}

fn collect<T>(
    errors: &mut Vec<StudentFieldError>,
    result: Result<T, StudentFieldError>,
) -> Option<T> {
    result.map_err(|error| errors.push(error)).ok()
}

fn present(field: StudentField, raw: Option<&str>) -> Result<&str, StudentFieldError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| StudentFieldError::missing(field))
}

fn parse_name(field: StudentField, raw: Option<&str>) -> Result<PersonName, StudentFieldError> {
    let value = present(field, raw)?;
    PersonName::parse(value).ok_or_else(|| {
        StudentFieldError::too_long(field, NAME_MAX_CHARS, value.chars().count())
    })
}

fn parse_email(raw: Option<&str>, status: EmailStatus) -> Result<EmailAddress, StudentFieldError> {
    let value = present(StudentField::Email, raw)?;
    let length = value.chars().count();
    if length > EMAIL_MAX_CHARS {
        return Err(StudentFieldError::too_long(
            StudentField::Email,
            EMAIL_MAX_CHARS,
            length,
        ));
    }
    let email = EmailAddress::parse(value).ok_or_else(|| {
        StudentFieldError::new(
            StudentField::Email,
            FieldErrorKind::InvalidFormat,
            "Please enter a valid email address.",
        )
    })?;
    match status {
        EmailStatus::Available => Ok(email),
        EmailStatus::Taken => Err(StudentFieldError::duplicate_email()),
    }
}

fn parse_date(field: StudentField, raw: Option<&str>) -> Result<NaiveDate, StudentFieldError> {
    let value = present(field, raw)?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        StudentFieldError::new(field, FieldErrorKind::InvalidFormat, "Enter a valid date.")
    })
}

fn parse_grade(raw: Option<&str>) -> Result<Grade, StudentFieldError> {
    let value = present(StudentField::Grade, raw)?;
    let number: i64 = value.parse().map_err(|_| {
        StudentFieldError::new(
            StudentField::Grade,
            FieldErrorKind::InvalidFormat,
            "Enter a whole number.",
        )
    })?;
    Grade::new(number).map_err(|_| {
        StudentFieldError::new(
            StudentField::Grade,
            FieldErrorKind::OutOfRange,
            format!("Grade must be between {} and {}.", Grade::MIN, Grade::MAX),
        )
    })
}
