use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use bugbook_core::common::error::BugbookError;
use bugbook_core::domain::{Bug, CommentParams};
use bugbook_core::storage::Storage;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{FormOrJson, ResponseFormat};
use crate::handlers::{bugs, redirect_with_notice};
use crate::state::AppState;

async fn load_bug(state: &AppState, bug_id: Uuid) -> Result<Bug, ApiError> {
    state
        .storage
        .get_bug_by_id(bug_id)
        .await?
        .ok_or_else(|| ApiError::not_found("bug", bug_id))
}

pub async fn index(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(bug_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    load_bug(&state, bug_id).await?;
    let comments = state.storage.get_comments_by_bug_id(bug_id).await?;

    match format {
        ResponseFormat::Json => Ok(Json(comments).into_response()),
        // Comments render on the bug page itself
        ResponseFormat::Html => Ok(Redirect::to(&format!("/bugs/{bug_id}")).into_response()),
    }
}

pub async fn create(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(bug_id): Path<Uuid>,
    FormOrJson(params): FormOrJson<CommentParams>,
) -> Result<Response, ApiError> {
    let bug = load_bug(&state, bug_id).await?;

    let mut errors = params.validate();
    if let Some(author_id) = params.author_uuid() {
        if state.storage.get_user_by_id(author_id).await?.is_none() {
            errors.add("author_id", "must exist");
        }
    }
    if !errors.is_empty() {
        return Ok(match format {
            ResponseFormat::Json => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            ResponseFormat::Html => {
                let page = bugs::render_show(&state, &bug, errors, None).await?;
                (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
            }
        });
    }

    let mut comment = params
        .into_comment(bug_id)
        .map_err(BugbookError::Validation)?;
    state.storage.create_comment(&mut comment).await?;

    match format {
        ResponseFormat::Json => Ok((StatusCode::CREATED, Json(comment)).into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            &format!("/bugs/{bug_id}"),
            "Comment was successfully created.",
        )
        .into_response()),
    }
}
