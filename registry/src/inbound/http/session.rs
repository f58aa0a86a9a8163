//! Signed-in account and flash messages, stored in the private session cookie.
//!
//! Handlers take a [`SessionContext`] extractor instead of the raw Actix
//! session and never touch cookie keys directly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{AccountId, Error};

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";
pub(crate) const FLASHES_KEY: &str = "flashes";

/// Severity of a flash message; doubles as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    /// The action completed.
    Success,
    /// The action was refused or failed.
    Error,
}

impl FlashLevel {
    /// CSS class used by the page renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Severity.
    pub level: FlashLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Flash {
    /// Success message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// Error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Request extractor over the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated account's id in the session cookie.
    ///
    /// The session key is renewed so a pre-login cookie cannot be replayed.
    pub fn persist_account(&self, account_id: &AccountId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, account_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current account id from the session, if present.
    pub fn account_id(&self) -> Result<Option<AccountId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(ACCOUNT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
        else {
            return Ok(None);
        };
        // A cookie that decrypts but holds garbage is treated as anonymous.
        Ok(raw
            .parse::<AccountId>()
            .inspect_err(|error| warn!(%error, "ignoring malformed account id in session"))
            .ok())
    }

    /// Whether a signed-in account is attached to this request.
    pub fn is_authenticated(&self) -> Result<bool, Error> {
        Ok(self.account_id()?.is_some())
    }

    /// Forget the signed-in account and any pending flashes.
    ///
    /// The session is cleared and renewed rather than purged so flashes
    /// queued afterwards still reach the next page.
    pub fn logout(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// Queue a flash for the next rendered page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut flashes = self.peek_flashes()?;
        flashes.push(flash);
        self.0
            .insert(FLASHES_KEY, flashes)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Remove and return every queued flash.
    pub fn take_flashes(&self) -> Result<Vec<Flash>, Error> {
        let flashes = self.peek_flashes()?;
        if !flashes.is_empty() {
            self.0.remove(FLASHES_KEY);
        }
        Ok(flashes)
    }

    fn peek_flashes(&self) -> Result<Vec<Flash>, Error> {
        self.0
            .get::<Vec<Flash>>(FLASHES_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read flashes: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[actix_web::test]
    async fn round_trips_account_id() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id: AccountId = FIXTURE_ID.parse().expect("fixture id");
                        session.persist_account(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.account_id()?.expect("account in session");
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn tampered_account_id_is_anonymous() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(ACCOUNT_ID_KEY, "not-a-uuid")
                            .expect("set invalid account id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/check",
                    web::get().to(|session: SessionContext| async move {
                        let authed = session.is_authenticated()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(authed.to_string()))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/check")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, "false");
    }

    #[actix_web::test]
    async fn flashes_are_consumed_once() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/push",
                    web::get().to(|session: SessionContext| async move {
                        session.push_flash(Flash::success("saved"))?;
                        session.push_flash(Flash::error("but also"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let flashes = session.take_flashes()?;
                        let rendered: Vec<_> = flashes
                            .iter()
                            .map(|flash| format!("{}:{}", flash.level.as_str(), flash.message))
                            .collect();
                        Ok::<_, Error>(HttpResponse::Ok().body(rendered.join("|")))
                    }),
                ),
        )
        .await;

        let push_res =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let cookie = push_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let updated = first
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie rewritten")
            .into_owned();
        let body = test::read_body(first).await;
        assert_eq!(body, "success:saved|error:but also");

        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(updated)
                .to_request(),
        )
        .await;
        let body = test::read_body(second).await;
        assert_eq!(body, "");
    }
}
