//! Handler tests for the account pages.

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{Account, AccountId, Error, PasswordHash, Username};
use crate::inbound::http::test_utils::{PortMocks, location, session_cookie, test_app};

const FORM: (&str, &str) = ("content-type", "application/x-www-form-urlencoded");

#[fixture]
fn mocks() -> PortMocks {
    PortMocks::default()
}

macro_rules! init {
    ($mocks:expr) => {
        test::init_service(test_app($mocks.into_state())).await
    };
}

/// Body of the page rendered with the flashes carried by `res`.
macro_rules! follow_flashes {
    ($app:expr, $res:expr) => {{
        let cookie = session_cookie(&$res).expect("session cookie set");
        let next = test::call_service(
            &$app,
            test::TestRequest::get()
                .uri("/forgot_password/")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(next).await;
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }};
}

fn account(name: &str) -> Account {
    Account {
        id: AccountId::random(),
        username: Username::new(name).expect("valid username"),
        password_hash: PasswordHash::generate("violet-harbour-42").expect("hash"),
        created_at: Utc::now(),
    }
}

#[rstest]
#[actix_web::test]
async fn register_success_redirects_to_login(mut mocks: PortMocks) {
    mocks
        .accounts
        .expect_register()
        .withf(|username, password| username == "grace" && password.confirmed())
        .times(1)
        .return_once(|_, _| Ok(account("grace")));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register/")
            .insert_header(FORM)
            .set_payload("username=grace&password1=violet-harbour-42&password2=violet-harbour-42")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some(LOGIN_PATH));
    let body = follow_flashes!(app, res);
    assert!(body.contains("Your account has been created! Please log in."));
}

#[rstest]
#[actix_web::test]
async fn register_failure_redisplays_form_with_messages(mut mocks: PortMocks) {
    mocks.accounts.expect_register().return_once(|_, _| {
        Err(AccountError::PolicyViolation(vec![
            "This password is too short. It must contain at least 8 characters.".to_owned(),
            "This password is entirely numeric.".to_owned(),
        ]))
    });
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register/")
            .insert_header(FORM)
            .set_payload("username=grace&password1=123&password2=123")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("There was an error creating your account."));
    assert!(body.contains("This password is entirely numeric."));
    assert!(body.contains("value=\"grace\""));
}

#[rstest]
#[actix_web::test]
async fn login_success_signs_in(mut mocks: PortMocks) {
    let account_id = AccountId::random();
    mocks
        .login
        .expect_authenticate()
        .withf(|credentials| credentials.username() == "ada")
        .times(1)
        .return_once(move |_| Ok(account_id));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login/")
            .insert_header(FORM)
            .set_payload("username=ada&password=violet-harbour-42")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/"));

    // Signed-in navigation shows the logout form.
    let body = follow_flashes!(app, res);
    assert!(body.contains("You are now logged in!"));
    assert!(body.contains("action=\"/logout/\""));
}

#[rstest]
#[case::wrong_password("username=ada&password=nope")]
#[case::blank_username("username=+&password=nope")]
#[actix_web::test]
async fn login_failures_share_one_message(mut mocks: PortMocks, #[case] body: &str) {
    mocks
        .login
        .expect_authenticate()
        .returning(|_| Err(AccountError::InvalidCredentials));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login/")
            .insert_header(FORM)
            .set_payload(body.to_owned())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Invalid username or password. Please try again."));
}

#[rstest]
#[actix_web::test]
async fn login_storage_failure_is_an_error_page(mut mocks: PortMocks) {
    mocks
        .login
        .expect_authenticate()
        .return_once(|_| Err(AccountError::Unavailable(Error::service_unavailable("down"))));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login/")
            .insert_header(FORM)
            .set_payload("username=ada&password=violet-harbour-42")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[rstest]
#[actix_web::test]
async fn logout_redirects_to_login_with_flash(mocks: PortMocks) {
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/logout/").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some(LOGIN_PATH));
    let body = follow_flashes!(app, res);
    assert!(body.contains("You have been logged out successfully!"));
    assert!(body.contains("href=\"/login/\""));
}

#[rstest]
#[actix_web::test]
async fn forgot_password_success_redirects_to_login(mut mocks: PortMocks) {
    mocks
        .accounts
        .expect_reset_password()
        .withf(|username, password| username == "ada" && password.confirmed())
        .times(1)
        .return_once(|_, _| Ok(()));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/forgot_password/")
            .insert_header(FORM)
            .set_payload(
                "username=ada&new_password=amber-lantern-77&confirm_password=amber-lantern-77",
            )
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some(LOGIN_PATH));
}

#[rstest]
#[case::unknown(AccountError::UserNotFound, "Username does not exist.")]
#[case::mismatch(AccountError::PasswordMismatch, "Passwords do not match.")]
#[case::policy(
    AccountError::PolicyViolation(vec!["This password is too common.".to_owned()]),
    "This password is too common."
)]
#[actix_web::test]
async fn forgot_password_failures_flash_and_return(
    mut mocks: PortMocks,
    #[case] error: AccountError,
    #[case] message: &str,
) {
    mocks
        .accounts
        .expect_reset_password()
        .return_once(move |_, _| Err(error));
    let app = init!(mocks);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/forgot_password/")
            .insert_header(FORM)
            .set_payload("username=ada&new_password=a&confirm_password=b")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/forgot_password/"));
    let body = follow_flashes!(app, res);
    assert!(body.contains(message));
}
