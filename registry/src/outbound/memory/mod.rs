//! In-process adapters for the storage ports.
//!
//! Used when no database URL is configured and by the HTTP integration
//! suite. They enforce the same constraints as the PostgreSQL schema so the
//! services behave identically on either backend.

mod account_repository;
mod student_repository;

pub use account_repository::InMemoryAccountRepository;
pub use student_repository::InMemoryStudentRepository;
