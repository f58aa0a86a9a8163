//! Account HTML handlers.
//!
//! ```text
//! GET, POST  /register/
//! GET, POST  /login/
//! GET, POST  /logout/
//! GET, POST  /forgot_password/
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::{AccountError, LoginCredentials, PasswordChange};
use crate::inbound::http::PageResult;
use crate::inbound::http::forms::{ForgotPasswordForm, LoginForm, RegisterForm};
use crate::inbound::http::pages::{self, Chrome, html, redirect};
use crate::inbound::http::session::{Flash, SessionContext};
use crate::inbound::http::state::HttpState;

pub(crate) const LOGIN_PATH: &str = "/login/";
const FORGOT_PASSWORD_PATH: &str = "/forgot_password/";
const INVALID_LOGIN: &str = "Invalid username or password. Please try again.";

/// Registration form.
#[get("/register/")]
pub async fn register_form(session: SessionContext) -> PageResult<HttpResponse> {
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::register_form("", &[], &chrome)))
}

/// Registration submission; success sends the user to the login page.
#[post("/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> PageResult<HttpResponse> {
    let form = form.into_inner();
    let password = PasswordChange::new(&form.password1, &form.password2);
    match state.accounts.register(&form.username, &password).await {
        Ok(_) => {
            session.push_flash(Flash::success("Your account has been created! Please log in."))?;
            Ok(redirect(LOGIN_PATH))
        }
        Err(AccountError::Unavailable(error)) => Err(error),
        Err(error) => {
            session.push_flash(Flash::error(
                "There was an error creating your account. Please correct the form below.",
            ))?;
            let chrome = Chrome::consume(&session)?;
            Ok(html(pages::register_form(
                form.username.trim(),
                &error.messages(),
                &chrome,
            )))
        }
    }
}

/// Login form.
#[get("/login/")]
pub async fn login_form(session: SessionContext) -> PageResult<HttpResponse> {
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::login_form("", &chrome)))
}

/// Login submission; success stores the account in the session.
#[post("/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> PageResult<HttpResponse> {
    let form = form.into_inner();
    let outcome = match LoginCredentials::try_from_parts(&form.username, &form.password) {
        Ok(credentials) => state.login.authenticate(&credentials).await,
        Err(_) => Err(AccountError::InvalidCredentials),
    };
    match outcome {
        Ok(account_id) => {
            session.persist_account(&account_id)?;
            session.push_flash(Flash::success("You are now logged in!"))?;
            Ok(redirect("/"))
        }
        Err(AccountError::Unavailable(error)) => Err(error),
        Err(_) => {
            session.push_flash(Flash::error(INVALID_LOGIN))?;
            let chrome = Chrome::consume(&session)?;
            Ok(html(pages::login_form(form.username.trim(), &chrome)))
        }
    }
}

async fn end_session(session: SessionContext) -> PageResult<HttpResponse> {
    if let Some(account_id) = session.account_id()? {
        info!(%account_id, "logout");
    }
    session.logout();
    session.push_flash(Flash::success("You have been logged out successfully!"))?;
    Ok(redirect(LOGIN_PATH))
}

/// Sign out via link.
#[get("/logout/")]
pub async fn logout_link(session: SessionContext) -> PageResult<HttpResponse> {
    end_session(session).await
}

/// Sign out via the navigation form.
#[post("/logout/")]
pub async fn logout(session: SessionContext) -> PageResult<HttpResponse> {
    end_session(session).await
}

/// Password reset form.
#[get("/forgot_password/")]
pub async fn forgot_password_form(session: SessionContext) -> PageResult<HttpResponse> {
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::forgot_password_form(&chrome)))
}

/// Password reset submission.
///
/// Failures come back to the form as one flash per message.
#[post("/forgot_password/")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ForgotPasswordForm>,
) -> PageResult<HttpResponse> {
    let form = form.into_inner();
    let password = PasswordChange::new(&form.new_password, &form.confirm_password);
    match state.accounts.reset_password(&form.username, &password).await {
        Ok(()) => {
            session.push_flash(Flash::success(
                "Your password has been successfully updated! Please log in with your new password.",
            ))?;
            Ok(redirect(LOGIN_PATH))
        }
        Err(AccountError::Unavailable(error)) => Err(error),
        Err(error) => {
            for message in error.messages() {
                session.push_flash(Flash::error(message))?;
            }
            Ok(redirect(FORGOT_PASSWORD_PATH))
        }
    }
}

/// Register every account route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register_form)
        .service(register)
        .service(login_form)
        .service(login)
        .service(logout_link)
        .service(logout)
        .service(forgot_password_form)
        .service(forgot_password);
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
