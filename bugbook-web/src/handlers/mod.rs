pub mod bugs;
pub mod comments;
pub mod contacts;
pub mod phones;
pub mod users;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use bugbook_core::domain::FieldErrors;

use crate::extract::ResponseFormat;

pub async fn home() -> Redirect {
    Redirect::to("/contacts")
}

pub async fn health() -> &'static str {
    "OK"
}

/// Redirect carrying a one-shot success notice in the query string. Spaces
/// become `+`, which the query deserializer turns back into spaces.
pub fn redirect_with_notice(path: &str, notice: &str) -> Redirect {
    Redirect::to(&format!("{path}?notice={}", notice.replace(' ', "+")))
}

/// The 422 response for a failed validation: the field-errors payload for
/// JSON clients, the re-rendered form for browsers.
pub fn invalid<T: Template>(format: ResponseFormat, template: T, errors: FieldErrors) -> Response {
    match format {
        ResponseFormat::Json => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
        ResponseFormat::Html => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(template.render().expect("Template rendering failed")),
        )
            .into_response(),
    }
}
