//! Driven port for student record storage.
//!
//! The record store is the last line of defence for the email uniqueness
//! and grade range invariants: adapters report a storage-level violation as
//! [`StudentPersistenceError::ConstraintViolation`] even when validation has
//! already run.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Student, StudentDraft, StudentFilter, StudentId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "student repository query failed: {message}",
        /// A uniqueness or check constraint rejected the write.
        ConstraintViolation { message: String } =>
            "student record violates a storage constraint: {message}",
        /// No record has the requested identifier.
        NotFound { id: i64 } => "student {id} not found",
    }
}

/// Port for reading and writing student records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a record and return it with its assigned identifier.
    async fn create(&self, draft: &StudentDraft) -> Result<Student, StudentPersistenceError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentPersistenceError>;

    /// Replace every field of an existing record.
    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, StudentPersistenceError>;

    /// Remove a record permanently.
    async fn delete(&self, id: StudentId) -> Result<(), StudentPersistenceError>;

    /// Records matching `filter`, ordered by identifier.
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StudentPersistenceError>;

    /// Whether a record other than `excluding` already uses `email`.
    async fn email_taken(
        &self,
        email: &EmailAddress,
        excluding: Option<StudentId>,
    ) -> Result<bool, StudentPersistenceError>;

    /// Distinct enrollment years across all records, ascending.
    async fn distinct_enrollment_years(&self) -> Result<Vec<i32>, StudentPersistenceError>;
}
