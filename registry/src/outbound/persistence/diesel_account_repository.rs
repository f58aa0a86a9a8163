//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, PasswordHash, Username};

use super::diesel_error_mapping::DieselFailure;
use super::models::{AccountRow, NewAccountRow};
use super::pool::DbPool;
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>, username: &str) -> AccountPersistenceError {
    match failure.into() {
        DieselFailure::Connection(message) => AccountPersistenceError::connection(message),
        // The only constraint on accounts is the unique username index.
        DieselFailure::Constraint(_) => AccountPersistenceError::duplicate_username(username),
        DieselFailure::Query(message) => AccountPersistenceError::query(message),
    }
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let username = Username::new(&row.username)
        .map_err(|err| AccountPersistenceError::query(format!("stored username invalid: {err}")))?;
    let password_hash = PasswordHash::from_phc(row.password_hash)
        .map_err(|err| AccountPersistenceError::query(format!("stored hash invalid: {err}")))?;
    Ok(Account {
        id: AccountId::from_uuid(row.id),
        username,
        password_hash,
        created_at: row.created_at,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let username = account.username.as_str();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, username))?;
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            username,
            password_hash: account.password_hash.as_str(),
            created_at: account.created_at,
        };
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, username))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let name = username.as_str();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, name))?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::username.eq(name))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err, name))?;
        row.map(row_to_account).transpose()
    }

    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountPersistenceError> {
        let label = id.to_string();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, &label))?;
        let affected = diesel::update(accounts::table.find(*id.as_uuid()))
            .set(accounts::password_hash.eq(password_hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err, &label))?;
        if affected == 0 {
            return Err(AccountPersistenceError::not_found(label));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn constraint_failures_name_the_username() {
        let err = map_failure(DieselFailure::Constraint("accounts_username_key".into()), "ada");
        assert_eq!(err, AccountPersistenceError::duplicate_username("ada"));
    }

    #[rstest]
    fn rows_with_corrupt_hashes_are_rejected() {
        let row = AccountRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            password_hash: "plaintext".to_owned(),
            created_at: Utc::now(),
        };
        assert!(matches!(
            row_to_account(row),
            Err(AccountPersistenceError::Query { .. })
        ));
    }
}
