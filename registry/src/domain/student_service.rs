//! Student record services.
//!
//! Implements the [`StudentCommand`] and [`StudentQuery`] driving ports on
//! top of a [`StudentRepository`]: validation with the email uniqueness
//! lookup, create/update/delete, and the list view assembly.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Paginator;
use tracing::{info, warn};

use crate::domain::ports::{
    StudentCommand, StudentMutationError, StudentPersistenceError, StudentQuery,
    StudentRepository,
};
use crate::domain::{
    EmailStatus, EnrollmentAnalytics, Error, ListingRequest, Student, StudentDraft,
    StudentFieldError, StudentId, StudentListing, StudentPayload, StudentValidationErrors,
};

/// Student service implementing the record driving ports.
#[derive(Clone)]
pub struct StudentService<R> {
    repository: Arc<R>,
}

impl<R> StudentService<R> {
    /// Create a new service over the given record store.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> StudentService<R>
where
    R: StudentRepository,
{
    fn map_persistence_error(error: StudentPersistenceError) -> Error {
        match error {
            StudentPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("student repository unavailable: {message}"))
            }
            StudentPersistenceError::Query { message } => {
                Error::internal(format!("student repository error: {message}"))
            }
            StudentPersistenceError::ConstraintViolation { message } => {
                Error::conflict(format!("student record conflicts with stored data: {message}"))
            }
            StudentPersistenceError::NotFound { id } => Self::not_found(id),
        }
    }

    fn not_found(id: i64) -> Error {
        Error::not_found(format!("student {id} not found"))
    }

    /// A write rejected by storage constraints after validation passed means
    /// another request claimed the email in between.
    fn map_write_error(error: StudentPersistenceError) -> StudentMutationError {
        match error {
            StudentPersistenceError::ConstraintViolation { message } => {
                warn!(%message, "student write hit a storage constraint");
                StudentValidationErrors::single(StudentFieldError::duplicate_email()).into()
            }
            other => Self::map_persistence_error(other).into(),
        }
    }

    async fn validated(
        &self,
        payload: &StudentPayload,
        editing: Option<StudentId>,
    ) -> Result<StudentDraft, StudentMutationError> {
        let status = match payload.well_formed_email() {
            Some(email) => {
                let taken = self
                    .repository
                    .email_taken(&email, editing)
                    .await
                    .map_err(Self::map_persistence_error)?;
                if taken {
                    EmailStatus::Taken
                } else {
                    EmailStatus::Available
                }
            }
            None => EmailStatus::Available,
        };
        Ok(payload.validate(status)?)
    }

    async fn existing(&self, id: StudentId) -> Result<Student, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Self::not_found(id.get()))
    }
}

#[async_trait]
impl<R> StudentCommand for StudentService<R>
where
    R: StudentRepository,
{
    async fn create(&self, payload: &StudentPayload) -> Result<Student, StudentMutationError> {
        let draft = self.validated(payload, None).await?;
        let student = self
            .repository
            .create(&draft)
            .await
            .map_err(Self::map_write_error)?;
        info!(student_id = %student.id(), "student created");
        Ok(student)
    }

    async fn update(
        &self,
        id: StudentId,
        payload: &StudentPayload,
    ) -> Result<Student, StudentMutationError> {
        self.existing(id).await?;
        let draft = self.validated(payload, Some(id)).await?;
        let student = self
            .repository
            .update(id, &draft)
            .await
            .map_err(Self::map_write_error)?;
        info!(student_id = %id, "student updated");
        Ok(student)
    }

    async fn delete(&self, id: StudentId) -> Result<(), Error> {
        self.repository
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(student_id = %id, "student deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> StudentQuery for StudentService<R>
where
    R: StudentRepository,
{
    async fn find(&self, id: StudentId) -> Result<Student, Error> {
        self.existing(id).await
    }

    async fn listing(&self, request: &ListingRequest) -> Result<StudentListing, Error> {
        let filter = request.filter();
        let matching = self
            .repository
            .list(&filter)
            .await
            .map_err(Self::map_persistence_error)?;

        // Analytics ignore the search text and only honour the year.
        let analytics = if filter.search().is_none() {
            EnrollmentAnalytics::from_dates(matching.iter().map(Student::enrollment_date))
        } else {
            let year_only = self
                .repository
                .list(&filter.without_search())
                .await
                .map_err(Self::map_persistence_error)?;
            EnrollmentAnalytics::from_dates(year_only.iter().map(Student::enrollment_date))
        };

        let available_years = self
            .repository
            .distinct_enrollment_years()
            .await
            .map_err(Self::map_persistence_error)?;

        let paginator = Paginator::new(matching.len(), request.page_size());
        let page = paginator.paginate(matching, request.page());
        Ok(StudentListing {
            page,
            request: request.clone(),
            available_years,
            analytics,
        })
    }
}

#[cfg(test)]
#[path = "student_service_tests.rs"]
mod tests;
