//! End-to-end page flows over the in-memory adapters.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{test, web};
use rstest::{fixture, rstest};

use registry::inbound::http::health::HealthState;
use registry::inbound::http::session_config::SessionSettings;
use registry::server::{AppDependencies, SESSION_COOKIE_NAME, build_app, build_http_state};

const FORM: (&str, &str) = ("content-type", "application/x-www-form-urlencoded");
const PASSWORD: &str = "violet-harbour-42";

#[fixture]
fn deps() -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(build_http_state(None)),
        session: SessionSettings::ephemeral(),
    }
}

/// Session cookie carried from one request to the next, as a browser would.
#[derive(Default)]
struct SessionJar(Option<Cookie<'static>>);

impl SessionJar {
    fn attach(&self, req: test::TestRequest) -> test::TestRequest {
        match &self.0 {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        }
    }

    fn keep<B>(&mut self, res: &ServiceResponse<B>) {
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.0 = Some(cookie.into_owned());
        }
    }
}

/// Send a request through the jar. Evaluates to `(status, location, body)`.
macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let req = $jar.attach($req);
        let res = test::call_service(&$app, req.to_request()).await;
        $jar.keep(&res);
        let status = res.status();
        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = test::read_body(res).await;
        (
            status,
            location,
            String::from_utf8(body.to_vec()).expect("utf8 body"),
        )
    }};
}

macro_rules! post_form {
    ($app:expr, $jar:expr, $uri:expr, $body:expr) => {
        send!(
            $app,
            $jar,
            test::TestRequest::post()
                .uri($uri)
                .insert_header(FORM)
                .set_payload($body.to_owned())
        )
    };
}

macro_rules! get {
    ($app:expr, $jar:expr, $uri:expr) => {
        send!($app, $jar, test::TestRequest::get().uri($uri))
    };
}

fn student_form(first: &str, last: &str, email: &str, enrolled: &str, grade: u8) -> String {
    format!(
        "first_name={first}&last_name={last}&email={}&date_of_birth=2010-05-04\
         &enrollment_date={enrolled}&grade={grade}",
        email.replace('@', "%40")
    )
}

macro_rules! sign_up_and_in {
    ($app:expr, $jar:expr) => {{
        let register = format!("username=ada&password1={PASSWORD}&password2={PASSWORD}");
        let (status, location, _) = post_form!($app, $jar, "/register/", register);
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("/login/"));
        let login = format!("username=ada&password={PASSWORD}");
        let (status, location, _) = post_form!($app, $jar, "/login/", login);
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("/"));
    }};
}

#[rstest]
#[actix_web::test]
async fn anonymous_visitors_can_browse_but_not_edit(deps: AppDependencies) {
    let app = test::init_service(build_app(deps)).await;
    let mut jar = SessionJar::default();

    let (status, _, body) = get!(app, jar, "/");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No students found."));
    assert!(body.contains("href=\"/register/\""));

    let form = student_form("Ann", "Lee", "ann@example.com", "2023-09-01", 6);
    let (status, location, _) = post_form!(app, jar, "/student/new/", form);
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/login/"));

    let (_, _, body) = get!(app, jar, "/login/");
    assert!(body.contains("Please login to add a new student."));

    let (_, _, body) = get!(app, jar, "/");
    assert!(body.contains("No students found."), "nothing was stored");
}

#[rstest]
#[actix_web::test]
async fn signed_in_user_manages_records(deps: AppDependencies) {
    let app = test::init_service(build_app(deps)).await;
    let mut jar = SessionJar::default();
    sign_up_and_in!(app, jar);

    for form in [
        student_form("Ann", "Lee", "ann@example.com", "2023-09-01", 6),
        student_form("Carl", "Diaz", "carl@example.com", "2022-02-14", 8),
        student_form("Dora", "Fox", "dora@example.com", "2022-11-30", 10),
    ] {
        let (status, location, _) = post_form!(app, jar, "/student/new/", form);
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("/"));
    }

    let duplicate = student_form("Anne", "Other", "ann@example.com", "2023-09-01", 7);
    let (status, _, body) = post_form!(app, jar, "/student/new/", duplicate);
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("A student with this email already exists."));

    let (status, _, body) = get!(app, jar, "/?q=ann");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ann Lee"));
    assert!(!body.contains("Carl Diaz"));

    let (_, _, body) = get!(app, jar, "/?selected_year=2022");
    assert!(body.contains("Carl Diaz"));
    assert!(body.contains("Dora Fox"));
    assert!(!body.contains("Ann Lee"));

    let (_, _, body) = get!(app, jar, "/?records_per_page=1&page=99");
    assert!(body.contains("Page 3 of 3"));
    assert!(body.contains("Showing 3 to 3 of 3 students"));

    let (status, _, body) = get!(
        app,
        jar,
        "/?records_per_page=1&page=1&page=2&records_per_page=oops&records_per_page=1"
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Page 2 of 3"));

    let (status, _, body) = get!(app, jar, "/?records_per_page=1&page=99999999999999999999");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Page 3 of 3"));

    let (_, _, body) = get!(app, jar, "/?records_per_page=7&page=abc");
    assert!(body.contains("Page 1 of 1"));
    assert!(body.contains("enrollment-data"));

    let edit = student_form("Ann", "Leigh", "ann@example.com", "2023-09-01", 7);
    let (status, location, _) = post_form!(app, jar, "/student/1/edit/", edit);
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/student/1/"));
    let (_, _, body) = get!(app, jar, "/student/1/");
    assert!(body.contains("Ann Leigh"));
    assert!(body.contains("Student information has been updated successfully!"));

    let bad_grade = student_form("Ann", "Leigh", "ann@example.com", "2023-09-01", 13);
    let (status, _, body) = post_form!(app, jar, "/student/1/edit/", bad_grade);
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("There was an error updating the student."));

    let (status, _, body) = get!(app, jar, "/student/1/delete/");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ann Leigh"));
    let (status, location, _) = send!(
        app,
        jar,
        test::TestRequest::post().uri("/student/1/delete/")
    );
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/"));

    let (status, _, _) = get!(app, jar, "/student/1/");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send!(
        app,
        jar,
        test::TestRequest::post().uri("/student/1/delete/")
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, location, _) = send!(app, jar, test::TestRequest::post().uri("/logout/"));
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/login/"));
    let (status, location, _) = get!(app, jar, "/student/2/edit/");
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/login/"));
}

#[rstest]
#[actix_web::test]
async fn password_reset_replaces_the_credential(deps: AppDependencies) {
    let app = test::init_service(build_app(deps)).await;
    let mut jar = SessionJar::default();
    sign_up_and_in!(app, jar);
    let _ = send!(app, jar, test::TestRequest::post().uri("/logout/"));

    let mismatch = "username=ada&new_password=amber-lantern-77&confirm_password=amber-lantern-78";
    let (status, location, _) = post_form!(app, jar, "/forgot_password/", mismatch);
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/forgot_password/"));
    let (_, _, body) = get!(app, jar, "/forgot_password/");
    assert!(body.contains("Passwords do not match."));

    let unknown = "username=nobody&new_password=amber-lantern-77&confirm_password=amber-lantern-77";
    let (_, location, _) = post_form!(app, jar, "/forgot_password/", unknown);
    assert_eq!(location.as_deref(), Some("/forgot_password/"));

    let reset = "username=ada&new_password=amber-lantern-77&confirm_password=amber-lantern-77";
    let (status, location, _) = post_form!(app, jar, "/forgot_password/", reset);
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/login/"));

    let old = format!("username=ada&password={PASSWORD}");
    let (status, _, body) = post_form!(app, jar, "/login/", old);
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Invalid username or password. Please try again."));

    let (status, location, _) = post_form!(
        app,
        jar,
        "/login/",
        "username=ada&password=amber-lantern-77"
    );
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_refused(deps: AppDependencies) {
    let app = test::init_service(build_app(deps)).await;
    let mut jar = SessionJar::default();
    sign_up_and_in!(app, jar);

    let again = format!("username=ada&password1={PASSWORD}&password2={PASSWORD}");
    let (status, _, body) = post_form!(app, jar, "/register/", again);
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("A user with that username already exists."));
}
