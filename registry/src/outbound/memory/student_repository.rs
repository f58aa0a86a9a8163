//! `StudentRepository` backed by a locked `BTreeMap`.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;

use crate::domain::ports::{StudentPersistenceError, StudentRepository};
use crate::domain::{EmailAddress, Student, StudentDraft, StudentFilter, StudentId};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Student>,
    last_id: i64,
}

impl Table {
    fn email_holder(&self, email: &EmailAddress) -> Option<StudentId> {
        self.rows
            .values()
            .find(|student| student.email() == email)
            .map(Student::id)
    }

    fn ensure_unique(
        &self,
        email: &EmailAddress,
        own: Option<StudentId>,
    ) -> Result<(), StudentPersistenceError> {
        match self.email_holder(email) {
            Some(holder) if Some(holder) != own => Err(
                StudentPersistenceError::constraint_violation("students_email_key"),
            ),
            _ => Ok(()),
        }
    }
}

/// In-memory student store with sequential identifiers.
///
/// # Examples
/// ```
/// use registry::outbound::memory::InMemoryStudentRepository;
///
/// let repo = InMemoryStudentRepository::default();
/// # let _ = repo;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    table: RwLock<Table>,
}

impl InMemoryStudentRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, draft: &StudentDraft) -> Result<Student, StudentPersistenceError> {
        let mut table = self.table.write().await;
        table.ensure_unique(&draft.email, None)?;
        let next = table.last_id + 1;
        let id = StudentId::new(next)
            .map_err(|err| StudentPersistenceError::query(err.to_string()))?;
        let student = Student::new(id, draft.clone());
        table.last_id = next;
        table.rows.insert(next, student.clone());
        Ok(student)
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentPersistenceError> {
        Ok(self.table.read().await.rows.get(&id.get()).cloned())
    }

    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, StudentPersistenceError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id.get()) {
            return Err(StudentPersistenceError::not_found(id.get()));
        }
        table.ensure_unique(&draft.email, Some(id))?;
        let student = Student::new(id, draft.clone());
        table.rows.insert(id.get(), student.clone());
        Ok(student)
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentPersistenceError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| StudentPersistenceError::not_found(id.get()))
    }

    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StudentPersistenceError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|student| filter.matches(student))
            .cloned()
            .collect())
    }

    async fn email_taken(
        &self,
        email: &EmailAddress,
        excluding: Option<StudentId>,
    ) -> Result<bool, StudentPersistenceError> {
        let table = self.table.read().await;
        Ok(table
            .email_holder(email)
            .is_some_and(|holder| Some(holder) != excluding))
    }

    async fn distinct_enrollment_years(&self) -> Result<Vec<i32>, StudentPersistenceError> {
        let table = self.table.read().await;
        let years: BTreeSet<i32> = table
            .rows
            .values()
            .map(|student| student.enrollment_date().year())
            .collect();
        Ok(years.into_iter().collect())
    }
}
