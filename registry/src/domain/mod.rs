//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed student and account model, the rules
//! applied to form input, and the services behind the driving ports. Nothing
//! here depends on Actix or Diesel; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - Error, ErrorCode - page-level failures carrying the request trace id.
//! - Student, StudentPayload, StudentFilter - record model and validation.
//! - ListingRequest, StudentListing, EnrollmentAnalytics - list view.
//! - Account, Username, PasswordHash, PasswordPolicy - accounts.
//! - StudentService, AccountService - driving port implementations.

pub mod account;
pub mod account_service;
pub mod credentials;
pub mod error;
pub mod listing;
pub mod password_policy;
pub mod ports;
pub mod student;
pub mod student_service;
pub mod trace_id;

pub use self::account::{
    Account, AccountError, AccountId, USERNAME_MAX_CHARS, Username, UsernameError,
};
pub use self::account_service::AccountService;
pub use self::credentials::{
    CredentialsError, LoginCredentials, PasswordChange, PasswordHash, PasswordHashError,
};
pub use self::error::{Error, ErrorCode};
pub use self::listing::{
    DEFAULT_PAGE_SIZE, EnrollmentAnalytics, ListingRequest, MONTH_LABELS, PAGE_SIZE_OPTIONS,
    StudentListing,
};
pub use self::password_policy::{MIN_PASSWORD_CHARS, PasswordPolicy};
pub use self::student::{
    EMAIL_MAX_CHARS, EmailAddress, EmailStatus, FieldErrorKind, Grade, GradeOutOfRange,
    InvalidStudentId, NAME_MAX_CHARS, PersonName, Student, StudentDraft, StudentField,
    StudentFieldError, StudentFilter, StudentId, StudentPayload, StudentValidationErrors,
};
pub use self::student_service::StudentService;
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
