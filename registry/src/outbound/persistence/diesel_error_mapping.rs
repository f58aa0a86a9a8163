//! Shared Diesel error classification for the repositories.
//!
//! Adapters translate the classification into their own port error, so the
//! logging and the constraint detection live in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be checked out.
    Connection(String),
    /// A unique or check constraint rejected the write.
    Constraint(String),
    /// Any other failure.
    Query(String),
}

impl From<PoolError> for DieselFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DieselFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::Constraint(
                info.constraint_name()
                    .unwrap_or_else(|| info.message())
                    .to_owned(),
            ),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

/// Escape `LIKE` wildcards so user search text matches literally.
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let failure = DieselFailure::from(PoolError::checkout("timed out"));
        assert_eq!(failure, DieselFailure::Connection("timed out".to_owned()));
    }

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found".to_owned()))]
    #[case(DieselError::RollbackTransaction, DieselFailure::Query("database error".to_owned()))]
    fn non_database_errors_are_query_errors(
        #[case] error: DieselError,
        #[case] expected: DieselFailure,
    ) {
        assert_eq!(DieselFailure::from(error), expected);
    }

    #[rstest]
    #[case("ann", "ann")]
    #[case("50%", "50\\%")]
    #[case("a_b\\c", "a\\_b\\\\c")]
    fn like_wildcards_are_escaped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_like(raw), expected);
    }
}
