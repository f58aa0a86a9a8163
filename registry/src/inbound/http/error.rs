//! Rendering of domain [`Error`]s as HTML error pages.
//!
//! Server faults are logged with their real message and shown to the
//! visitor with a generic one; the trace id goes both into the
//! `trace-id` header and onto the page so a report can be matched to logs.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::inbound::http::pages::error_page;

/// Result type returned by page handlers.
pub type PageResult<T> = Result<T, Error>;

const GENERIC_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().map(|id| id.to_string());
        let shown = if self.code() == ErrorCode::InternalError {
            GENERIC_MESSAGE
        } else {
            self.message()
        };
        if self.code().is_server_fault() {
            error!(
                status = status.as_u16(),
                trace_id = trace_id.as_deref().unwrap_or("-"),
                message = self.message(),
                "page failed"
            );
        }

        let mut response = HttpResponse::build(status);
        response.content_type(ContentType::html());
        if let Some(id) = trace_id.as_deref() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.body(error_page(status, shown, trace_id.as_deref()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error raised inside a handler");
        Error::internal(GENERIC_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
