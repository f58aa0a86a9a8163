//! Failures that escape the services as whole-page errors.
//!
//! Field problems and account outcomes have their own types; this one covers
//! what is left: missing records, storage outages and internal faults. The
//! HTTP adapter picks the status code and renders the page.

use super::TraceId;

/// Failure category, used by adapters to choose a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Input could not be interpreted at all.
    InvalidRequest,
    /// No record with the requested identifier.
    NotFound,
    /// The write clashes with stored state.
    Conflict,
    /// Storage cannot be reached.
    ServiceUnavailable,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Whether the fault lies with the server rather than the request.
    #[must_use]
    pub const fn is_server_fault(self) -> bool {
        matches!(self, Self::ServiceUnavailable | Self::InternalError)
    }
}

/// Page-level failure tagged with the trace id of the request that raised it.
///
/// # Examples
/// ```
/// use registry::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("student 4 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "student 4 not found");
/// assert!(err.trace_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    trace_id: Option<TraceId>,
}

macro_rules! constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Error with [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl DomainError {
    /// Build an error, picking up the trace id in scope.
    ///
    /// Blank messages are replaced with a generic one so pages never render
    /// an empty explanation.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = String::from("Something went wrong");
        }
        Self {
            code,
            message,
            trace_id: TraceId::current(),
        }
    }

    constructors! {
        invalid_request => InvalidRequest,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message as raised; may hold internal detail for server faults.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Request the error was raised under.
    #[must_use]
    pub const fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Replace the captured trace id.
    #[must_use]
    pub const fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

/// Shorthand used across the crate.
pub type Error = DomainError;
