//! Driving port for student record mutations.

use async_trait::async_trait;

use crate::domain::{Error, Student, StudentId, StudentPayload, StudentValidationErrors};

/// Outcome of a rejected create or update.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StudentMutationError {
    /// The submission failed field validation; redisplay the form.
    #[error(transparent)]
    Invalid(#[from] StudentValidationErrors),
    /// The record is missing or storage failed.
    #[error(transparent)]
    Failed(#[from] Error),
}

/// Domain use-case port for creating, editing and deleting students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentCommand: Send + Sync {
    /// Validate and store a new record.
    async fn create(&self, payload: &StudentPayload) -> Result<Student, StudentMutationError>;

    /// Validate and overwrite an existing record.
    async fn update(
        &self,
        id: StudentId,
        payload: &StudentPayload,
    ) -> Result<Student, StudentMutationError>;

    /// Delete an existing record.
    async fn delete(&self, id: StudentId) -> Result<(), Error>;
}
