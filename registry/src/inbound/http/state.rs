//! Ports handed to every page handler through `web::Data`.
//!
//! Handlers see trait objects only, so tests swap in mocks and the server
//! chooses between the Diesel and in-memory adapters at start-up.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, LoginService, StudentCommand, StudentQuery};

/// Driving ports used by the student and account pages.
#[derive(Clone)]
pub struct HttpState {
    /// Create, update and delete student records.
    pub students: Arc<dyn StudentCommand>,
    /// Look up single records and build the list view.
    pub students_query: Arc<dyn StudentQuery>,
    /// Check credentials on login.
    pub login: Arc<dyn LoginService>,
    /// Registration and password reset.
    pub accounts: Arc<dyn AccountCommand>,
}

impl HttpState {
    /// Bundle the four ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use registry::domain::{AccountService, StudentService};
    /// use registry::inbound::http::state::HttpState;
    /// use registry::outbound::memory::{InMemoryAccountRepository, InMemoryStudentRepository};
    ///
    /// let students = Arc::new(StudentService::new(Arc::new(InMemoryStudentRepository::new())));
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(students.clone(), students, accounts.clone(), accounts);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        students: Arc<dyn StudentCommand>,
        students_query: Arc<dyn StudentQuery>,
        login: Arc<dyn LoginService>,
        accounts: Arc<dyn AccountCommand>,
    ) -> Self {
        Self {
            students,
            students_query,
            login,
            accounts,
        }
    }
}
