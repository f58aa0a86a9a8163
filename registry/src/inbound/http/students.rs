//! Student record HTML handlers.
//!
//! ```text
//! GET        /                       list, search, paginate
//! GET        /student/{id}/          detail
//! GET, POST  /student/new/           create (sign-in required)
//! GET, POST  /student/{id}/edit/     edit (sign-in required)
//! GET, POST  /student/{id}/delete/   delete (sign-in required)
//! ```
//!
//! Anonymous requests to the mutating routes are redirected to the login page
//! with a flash and never reach the ports.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::domain::ports::StudentMutationError;
use crate::domain::{Error, ListingRequest, StudentId, StudentPayload};
use crate::inbound::http::PageResult;
use crate::inbound::http::accounts::LOGIN_PATH;
use crate::inbound::http::forms::ListingQuery;
use crate::inbound::http::pages::{self, Chrome, html, redirect};
use crate::inbound::http::session::{Flash, SessionContext};
use crate::inbound::http::state::HttpState;

const LIST_PATH: &str = "/";
const NEW_PATH: &str = "/student/new/";

const LOGIN_TO_CREATE: &str = "Please login to add a new student.";
const LOGIN_TO_EDIT: &str = "Please login to edit an existing student.";
const LOGIN_TO_DELETE: &str = "Please login to delete an existing student.";

fn detail_path(id: StudentId) -> String {
    format!("/student/{id}/")
}

fn edit_path(id: StudentId) -> String {
    format!("/student/{id}/edit/")
}

fn parse_id(raw: i64) -> Result<StudentId, Error> {
    StudentId::new(raw).map_err(|_| Error::not_found(format!("student {raw} not found")))
}

/// Redirect to the login page unless the session is signed in.
fn require_login(session: &SessionContext, message: &str) -> PageResult<Option<HttpResponse>> {
    if session.is_authenticated()? {
        return Ok(None);
    }
    session.push_flash(Flash::error(message))?;
    Ok(Some(redirect(LOGIN_PATH)))
}

/// List view with search, year filter, page size and analytics.
#[get("/")]
pub async fn list_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> PageResult<HttpResponse> {
    let request = ListingRequest::from(&ListingQuery::from_query_string(req.query_string()));
    let listing = state.students_query.listing(&request).await?;
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::student_list(&listing, req.query_string(), &chrome)))
}

/// Detail view; a missing record renders the 404 page.
#[get("/student/{id}/")]
pub async fn student_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> PageResult<HttpResponse> {
    let id = parse_id(path.into_inner())?;
    let student = state.students_query.find(id).await?;
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::student_detail(&student, &chrome)))
}

/// Empty create form.
#[get("/student/new/")]
pub async fn new_student_form(session: SessionContext) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_CREATE)? {
        return Ok(response);
    }
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::student_form(
        "Add student",
        NEW_PATH,
        &StudentPayload::default(),
        None,
        &chrome,
    )))
}

/// Create submission.
#[post("/student/new/")]
pub async fn create_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<StudentPayload>,
) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_CREATE)? {
        return Ok(response);
    }
    let payload = form.into_inner();
    match state.students.create(&payload).await {
        Ok(student) => {
            info!(student_id = %student.id(), "student created via form");
            session.push_flash(Flash::success("Student has been created successfully!"))?;
            Ok(redirect(LIST_PATH))
        }
        Err(StudentMutationError::Invalid(errors)) => {
            session.push_flash(Flash::error(
                "There was an error creating the student. Please correct the form below.",
            ))?;
            let chrome = Chrome::consume(&session)?;
            Ok(html(pages::student_form(
                "Add student",
                NEW_PATH,
                &payload,
                Some(&errors),
                &chrome,
            )))
        }
        Err(StudentMutationError::Failed(error)) => Err(error),
    }
}

/// Edit form pre-filled from the stored record.
#[get("/student/{id}/edit/")]
pub async fn edit_student_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_EDIT)? {
        return Ok(response);
    }
    let id = parse_id(path.into_inner())?;
    let student = state.students_query.find(id).await?;
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::student_form(
        "Edit student",
        &edit_path(id),
        &StudentPayload::from_student(&student),
        None,
        &chrome,
    )))
}

/// Edit submission; success lands on the detail page.
#[post("/student/{id}/edit/")]
pub async fn update_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    form: web::Form<StudentPayload>,
) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_EDIT)? {
        return Ok(response);
    }
    let id = parse_id(path.into_inner())?;
    let payload = form.into_inner();
    match state.students.update(id, &payload).await {
        Ok(student) => {
            session.push_flash(Flash::success(
                "Student information has been updated successfully!",
            ))?;
            Ok(redirect(&detail_path(student.id())))
        }
        Err(StudentMutationError::Invalid(errors)) => {
            session.push_flash(Flash::error(
                "There was an error updating the student. Please correct the form below.",
            ))?;
            let chrome = Chrome::consume(&session)?;
            Ok(html(pages::student_form(
                "Edit student",
                &edit_path(id),
                &payload,
                Some(&errors),
                &chrome,
            )))
        }
        Err(StudentMutationError::Failed(error)) => Err(error),
    }
}

/// Delete confirmation.
#[get("/student/{id}/delete/")]
pub async fn delete_student_confirm(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_DELETE)? {
        return Ok(response);
    }
    let id = parse_id(path.into_inner())?;
    let student = state.students_query.find(id).await?;
    let chrome = Chrome::consume(&session)?;
    Ok(html(pages::delete_confirmation(&student, &chrome)))
}

/// Hard delete.
#[post("/student/{id}/delete/")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> PageResult<HttpResponse> {
    if let Some(response) = require_login(&session, LOGIN_TO_DELETE)? {
        return Ok(response);
    }
    let id = parse_id(path.into_inner())?;
    state.students.delete(id).await?;
    session.push_flash(Flash::success("Student has been deleted successfully!"))?;
    Ok(redirect(LIST_PATH))
}

/// Register every student route on `cfg`.
///
/// The literal `/student/new/` routes are registered ahead of the
/// `/student/{id}/` family so `new` is never captured as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_students)
        .service(new_student_form)
        .service(create_student)
        .service(student_detail)
        .service(edit_student_form)
        .service(update_student)
        .service(delete_student_confirm)
        .service(delete_student);
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
