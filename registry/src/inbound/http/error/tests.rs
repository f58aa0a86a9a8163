//! Status mapping and page rendering for domain errors.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use uuid::Uuid;

use crate::domain::TraceId;

#[fixture]
fn trace_id() -> TraceId {
    TraceId::from_uuid(Uuid::from_u128(42))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(err.status_code(), status);
}

async fn render(error: &Error) -> (StatusCode, Option<String>, String) {
    let response = error.error_response();
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("body");
    (status, header, String::from_utf8(bytes.to_vec()).expect("utf8"))
}

#[rstest]
#[actix_web::test]
async fn not_found_page_shows_message_and_reference(trace_id: TraceId) {
    let error = Error::not_found("student 9 not found").with_trace_id(trace_id);
    let (status, header, body) = render(&error).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(header, Some(trace_id.to_string()));
    assert!(body.contains("student 9 not found"));
    assert!(body.contains(&trace_id.to_string()));
}

#[rstest]
#[actix_web::test]
async fn internal_detail_stays_off_the_page(trace_id: TraceId) {
    let error = Error::internal("connection to postgres://secret refused").with_trace_id(trace_id);
    let (status, _, body) = render(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(GENERIC_MESSAGE));
    assert!(!body.contains("postgres://secret"));
}

#[rstest]
#[actix_web::test]
async fn no_header_without_trace_id() {
    let (_, header, body) = render(&Error::not_found("missing")).await;
    assert!(header.is_none());
    assert!(!body.contains("Reference:"));
}

#[rstest]
fn actix_errors_become_internal() {
    let mapped = Error::from(actix_web::error::ErrorBadRequest("raw detail"));
    assert_eq!(mapped.code(), ErrorCode::InternalError);
    assert_eq!(mapped.message(), GENERIC_MESSAGE);
}
