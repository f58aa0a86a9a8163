//! Form and query-string bodies accepted by the HTML handlers.
//!
//! Every field is optional so a missing input becomes a validation message
//! rather than a `400` from the extractor.

use serde::Deserialize;

use crate::domain::ListingRequest;

/// Query string of the list view.
#[derive(Debug, Default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub selected_year: Option<String>,
    pub records_per_page: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Read the list parameters from a raw query string.
    ///
    /// Never fails: unknown keys are ignored and a repeated key keeps its
    /// last value, so a hand-edited URL still renders the list.
    #[must_use]
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "q" => &mut query.q,
                "selected_year" => &mut query.selected_year,
                "records_per_page" => &mut query.records_per_page,
                "page" => &mut query.page,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        query
    }
}

impl From<&ListingQuery> for ListingRequest {
    fn from(query: &ListingQuery) -> Self {
        ListingRequest::from_raw(
            query.q.as_deref(),
            query.selected_year.as_deref(),
            query.records_per_page.as_deref(),
            query.page.as_deref(),
        )
    }
}

/// `POST /login/` body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /register/` body.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// `POST /forgot_password/` body.
#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}
