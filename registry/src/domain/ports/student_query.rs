//! Driving port for student reads: detail lookups and the list view.

use async_trait::async_trait;

use crate::domain::{Error, ListingRequest, Student, StudentId, StudentListing};

/// Domain use-case port for reading students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentQuery: Send + Sync {
    /// Fetch one record; a missing record is [`crate::domain::ErrorCode::NotFound`].
    async fn find(&self, id: StudentId) -> Result<Student, Error>;

    /// Build the list view for a normalised request.
    async fn listing(&self, request: &ListingRequest) -> Result<StudentListing, Error>;
}
