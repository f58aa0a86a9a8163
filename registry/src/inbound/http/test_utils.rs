//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};

use crate::domain::ports::{
    MockAccountCommand, MockLoginService, MockStudentCommand, MockStudentQuery,
};
use crate::domain::{AccountId, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, students};

/// Route that signs the caller in as a random account.
pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Cookie sessions under a throwaway key, sent over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocks for every driving port; unset expectations panic when called.
#[derive(Default)]
pub struct PortMocks {
    /// Student writes.
    pub students: MockStudentCommand,
    /// Student reads and listing.
    pub students_query: MockStudentQuery,
    /// Credential checks.
    pub login: MockLoginService,
    /// Registration and password reset.
    pub accounts: MockAccountCommand,
}

impl PortMocks {
    /// Move the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.students),
            Arc::new(self.students_query),
            Arc::new(self.login),
            Arc::new(self.accounts),
        )
    }
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

async fn sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_account(&AccountId::random())?;
    Ok(HttpResponse::Ok().finish())
}

/// Application with every page route, a test session and [`SIGN_IN_PATH`].
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(SIGN_IN_PATH, web::get().to(sign_in))
        .configure(students::configure)
        .configure(accounts::configure)
}
