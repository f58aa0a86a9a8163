//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use uuid::Uuid;

use crate::domain::StudentDraft;

use super::schema::{accounts, students};

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub enrollment_date: NaiveDate,
    pub grade: i16,
}

/// Column values written on insert and update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = students)]
pub(crate) struct StudentValues<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub date_of_birth: NaiveDate,
    pub enrollment_date: NaiveDate,
    pub grade: i16,
}

impl<'a> From<&'a StudentDraft> for StudentValues<'a> {
    fn from(draft: &'a StudentDraft) -> Self {
        Self {
            first_name: draft.first_name.as_str(),
            last_name: draft.last_name.as_str(),
            email: draft.email.as_str(),
            date_of_birth: draft.date_of_birth,
            enrollment_date: draft.enrollment_date,
            grade: i16::from(draft.grade.get()),
        }
    }
}

/// One row of the distinct enrollment years query.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct EnrollmentYearRow {
    #[diesel(sql_type = Integer)]
    pub year: i32,
}

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}
