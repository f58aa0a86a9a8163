//! PostgreSQL-backed `StudentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StudentPersistenceError, StudentRepository};
use crate::domain::{
    EmailAddress, Grade, PersonName, Student, StudentDraft, StudentFilter, StudentId,
};

use super::diesel_error_mapping::{DieselFailure, escape_like};
use super::models::{EnrollmentYearRow, StudentRow, StudentValues};
use super::pool::DbPool;
use super::schema::students;

const DISTINCT_YEARS_SQL: &str = "SELECT DISTINCT CAST(EXTRACT(YEAR FROM enrollment_date) AS INTEGER) AS year \
     FROM students ORDER BY year";

/// Diesel-backed implementation of the `StudentRepository` port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> StudentPersistenceError {
    match failure.into() {
        DieselFailure::Connection(message) => StudentPersistenceError::connection(message),
        DieselFailure::Constraint(message) => {
            StudentPersistenceError::constraint_violation(message)
        }
        DieselFailure::Query(message) => StudentPersistenceError::query(message),
    }
}

/// Rows are written through validated drafts, so a row that fails
/// validation on the way back out indicates manual tampering.
fn row_to_student(row: StudentRow) -> Result<Student, StudentPersistenceError> {
    let invalid = |column: &str| {
        warn!(student_id = row.id, column, "stored student row is invalid");
        StudentPersistenceError::query(format!("stored student {} has invalid {column}", row.id))
    };
    let id = StudentId::new(row.id).map_err(|_| invalid("id"))?;
    let fields = StudentDraft {
        first_name: PersonName::parse(&row.first_name).ok_or_else(|| invalid("first_name"))?,
        last_name: PersonName::parse(&row.last_name).ok_or_else(|| invalid("last_name"))?,
        email: EmailAddress::parse(&row.email).ok_or_else(|| invalid("email"))?,
        date_of_birth: row.date_of_birth,
        enrollment_date: row.enrollment_date,
        grade: Grade::new(i64::from(row.grade)).map_err(|_| invalid("grade"))?,
    };
    Ok(Student::new(id, fields))
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
    Some((start, end))
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn create(&self, draft: &StudentDraft) -> Result<Student, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = diesel::insert_into(students::table)
            .values(StudentValues::from(draft))
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        row_to_student(row)
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<StudentRow> = students::table
            .find(id.get())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_student).transpose()
    }

    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<StudentRow> = diesel::update(students::table.find(id.get()))
            .set(StudentValues::from(draft))
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map_or_else(
            || Err(StudentPersistenceError::not_found(id.get())),
            row_to_student,
        )
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let affected = diesel::delete(students::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        if affected == 0 {
            return Err(StudentPersistenceError::not_found(id.get()));
        }
        Ok(())
    }

    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StudentPersistenceError> {
        let mut query = students::table
            .select(StudentRow::as_select())
            .order(students::id.asc())
            .into_boxed();

        if let Some(text) = filter.search() {
            let pattern = format!("%{}%", escape_like(text));
            query = query.filter(
                students::first_name
                    .ilike(pattern.clone())
                    .or(students::last_name.ilike(pattern)),
            );
        }
        if let Some(year) = filter.enrollment_year() {
            let Some((start, end)) = year_bounds(year) else {
                return Ok(Vec::new());
            };
            query = query.filter(
                students::enrollment_date
                    .ge(start)
                    .and(students::enrollment_date.lt(end)),
            );
        }

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<StudentRow> = query.load(&mut conn).await.map_err(map_failure)?;
        rows.into_iter().map(row_to_student).collect()
    }

    async fn email_taken(
        &self,
        email: &EmailAddress,
        excluding: Option<StudentId>,
    ) -> Result<bool, StudentPersistenceError> {
        let mut query = students::table
            .select(students::id)
            .filter(students::email.eq(email.as_str()))
            .into_boxed();
        if let Some(id) = excluding {
            query = query.filter(students::id.ne(id.get()));
        }

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let holder: Option<i64> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        Ok(holder.is_some())
    }

    async fn distinct_enrollment_years(&self) -> Result<Vec<i32>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<EnrollmentYearRow> = diesel::sql_query(DISTINCT_YEARS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(|row| row.year).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and filter helpers; queries are covered by the
    //! in-memory adapter sharing the same port contract.
    use super::*;
    use rstest::{fixture, rstest};

    fn sample_row() -> StudentRow {
        StudentRow {
            id: 3,
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: "ann@example.com".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(2011, 3, 3).expect("date"),
            enrollment_date: NaiveDate::from_ymd_opt(2023, 9, 1).expect("date"),
            grade: 6,
        }
    }

    #[fixture]
    fn row() -> StudentRow {
        sample_row()
    }

    #[rstest]
    fn valid_rows_convert(row: StudentRow) {
        let student = row_to_student(row).expect("row converts");
        assert_eq!(student.id().get(), 3);
        assert_eq!(student.enrollment_year(), 2023);
    }

    #[rstest]
    #[case::grade(StudentRow { grade: 13, ..sample_row() })]
    #[case::email(StudentRow { email: "nope".to_owned(), ..sample_row() })]
    #[case::id(StudentRow { id: 0, ..sample_row() })]
    fn corrupt_rows_are_query_errors(#[case] corrupt: StudentRow) {
        let err = row_to_student(corrupt).expect_err("corrupt row must fail");
        assert!(matches!(err, StudentPersistenceError::Query { .. }));
    }

    #[rstest]
    fn year_bounds_cover_whole_year() {
        let (start, end) = year_bounds(2023).expect("bounds");
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
        assert!(year_bounds(i32::MAX).is_none());
    }

    #[rstest]
    #[case(
        DieselFailure::Connection("down".to_owned()),
        "student repository connection failed: down"
    )]
    #[case(
        DieselFailure::Constraint("students_email_key".to_owned()),
        "student record violates a storage constraint: students_email_key"
    )]
    fn failures_map_to_port_errors(#[case] failure: DieselFailure, #[case] expected: &str) {
        assert_eq!(map_failure(failure).to_string(), expected);
    }
}
