use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bugbook_core::common::error::BugbookError;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps core errors onto HTTP responses: missing records are 404, validation
/// failures 422 with the field-errors payload, everything else a logged 500.
pub struct ApiError(BugbookError);

impl ApiError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self(BugbookError::NotFound { entity, id })
    }
}

impl From<BugbookError> for ApiError {
    fn from(err: BugbookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            BugbookError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("{entity} not found"),
                }),
            )
                .into_response(),
            BugbookError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            other => {
                error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
