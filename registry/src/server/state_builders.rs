//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use crate::domain::ports::{AccountRepository, StudentRepository};
use crate::domain::{AccountService, StudentService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryAccountRepository, InMemoryStudentRepository};
use crate::outbound::persistence::{DbPool, DieselAccountRepository, DieselStudentRepository};

/// Services over one student store and one account store.
fn state_over<S, A>(students: S, accounts: A) -> HttpState
where
    S: StudentRepository + 'static,
    A: AccountRepository + 'static,
{
    let students = Arc::new(StudentService::new(Arc::new(students)));
    let accounts = Arc::new(AccountService::new(
        Arc::new(accounts),
        Arc::new(DefaultClock),
    ));
    HttpState::new(students.clone(), students, accounts.clone(), accounts)
}

/// Diesel adapters when a pool is available, in-memory adapters otherwise.
pub fn build_http_state(db_pool: Option<&DbPool>) -> HttpState {
    match db_pool {
        Some(pool) => {
            info!(storage = "postgres", "wiring repositories");
            state_over(
                DieselStudentRepository::new(pool.clone()),
                DieselAccountRepository::new(pool.clone()),
            )
        }
        None => {
            info!(storage = "memory", "wiring repositories");
            state_over(
                InMemoryStudentRepository::new(),
                InMemoryAccountRepository::new(),
            )
        }
    }
}
