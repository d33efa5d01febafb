use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use bugbook_core::common::error::BugbookError;
use bugbook_core::domain::{Bug, BugParams, FieldErrors};
use bugbook_core::storage::Storage;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{FormOrJson, ResponseFormat};
use crate::handlers::{invalid, redirect_with_notice};
use crate::models::{ListQuery, NoticeQuery, WebBug, WebComment, WebUser};
use crate::state::AppState;
use crate::templates::{BugShowTemplate, BugsIndexTemplate, EditBugTemplate, NewBugTemplate};

async fn user_names(state: &AppState) -> Result<HashMap<Uuid, String>, ApiError> {
    let users = state.storage.get_all_users().await?;
    Ok(users
        .into_iter()
        .filter_map(|user| user.id.map(|id| (id, user.name)))
        .collect())
}

async fn web_users(state: &AppState) -> Result<Vec<WebUser>, ApiError> {
    let users = state.storage.get_all_users().await?;
    Ok(users.iter().map(WebUser::from).collect())
}

/// Reporter and assignee must name existing users; the id fields are already
/// known to be well-formed by the time this runs.
async fn check_references(
    state: &AppState,
    params: &BugParams,
    errors: &mut FieldErrors,
) -> Result<(), ApiError> {
    if let Some(reporter_id) = params.reporter_uuid() {
        if state.storage.get_user_by_id(reporter_id).await?.is_none() {
            errors.add("reporter_id", "must exist");
        }
    }
    if let Some(assignee_id) = params.assignee_uuid() {
        if state.storage.get_user_by_id(assignee_id).await?.is_none() {
            errors.add("assignee_id", "must exist");
        }
    }
    Ok(())
}

fn params_from_bug(bug: &Bug) -> BugParams {
    BugParams {
        title: Some(bug.title.clone()),
        description: Some(bug.description.clone()),
        reporter_id: Some(bug.reporter_id.to_string()),
        assignee_id: bug.assignee_id.map(|id| id.to_string()),
    }
}

/// Renders the bug page with its comments and the comment form. The comment
/// handler reuses this to re-render the page when a comment fails validation.
pub(super) async fn render_show(
    state: &AppState,
    bug: &Bug,
    comment_errors: FieldErrors,
    notice: Option<String>,
) -> Result<Html<String>, ApiError> {
    let names = user_names(state).await?;
    let comments = state
        .storage
        .get_comments_by_bug_id(bug.id.unwrap_or_default())
        .await?;
    let template = BugShowTemplate {
        bug: WebBug::with_names(bug, &names),
        comments: comments
            .iter()
            .map(|comment| WebComment::with_names(comment, &names))
            .collect(),
        users: web_users(state).await?,
        comment_errors,
        notice,
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn index(
    State(state): State<AppState>,
    format: ResponseFormat,
    Query(list): Query<ListQuery>,
    Query(flash): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    let bugs = state.storage.get_all_bugs(list.limit, list.offset).await?;

    match format {
        ResponseFormat::Json => Ok(Json(bugs).into_response()),
        ResponseFormat::Html => {
            let names = user_names(&state).await?;
            let template = BugsIndexTemplate {
                bugs: bugs.iter().map(|bug| WebBug::with_names(bug, &names)).collect(),
                notice: flash.notice,
            };
            Ok(Html(template.render().expect("Template rendering failed")).into_response())
        }
    }
}

pub async fn show(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(id): Path<Uuid>,
    Query(flash): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    let bug = state
        .storage
        .get_bug_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("bug", id))?;

    match format {
        ResponseFormat::Json => Ok(Json(bug).into_response()),
        ResponseFormat::Html => Ok(render_show(&state, &bug, FieldErrors::default(), flash.notice)
            .await?
            .into_response()),
    }
}

pub async fn new(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let template = NewBugTemplate::new(
        &BugParams::default(),
        web_users(&state).await?,
        FieldErrors::default(),
    );
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn create(
    State(state): State<AppState>,
    format: ResponseFormat,
    FormOrJson(params): FormOrJson<BugParams>,
) -> Result<Response, ApiError> {
    let mut errors = params.validate();
    check_references(&state, &params, &mut errors).await?;
    if !errors.is_empty() {
        let template = NewBugTemplate::new(&params, web_users(&state).await?, errors.clone());
        return Ok(invalid(format, template, errors));
    }

    let mut bug = params.into_bug().map_err(BugbookError::Validation)?;
    state.storage.create_bug(&mut bug).await?;
    let id = bug.id.unwrap_or_default();

    match format {
        ResponseFormat::Json => Ok((StatusCode::CREATED, Json(bug)).into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            &format!("/bugs/{id}"),
            "Bug was successfully created.",
        )
        .into_response()),
    }
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let bug = state
        .storage
        .get_bug_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("bug", id))?;

    let template = EditBugTemplate::new(
        id,
        &params_from_bug(&bug),
        web_users(&state).await?,
        FieldErrors::default(),
    );
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn update(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(id): Path<Uuid>,
    FormOrJson(params): FormOrJson<BugParams>,
) -> Result<Response, ApiError> {
    let existing = state
        .storage
        .get_bug_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("bug", id))?;

    let mut errors = params.validate();
    check_references(&state, &params, &mut errors).await?;
    if !errors.is_empty() {
        let template =
            EditBugTemplate::new(id, &params, web_users(&state).await?, errors.clone());
        return Ok(invalid(format, template, errors));
    }

    let mut bug = params.into_bug().map_err(BugbookError::Validation)?;
    bug.id = Some(id);
    bug.created_at = existing.created_at;
    bug.updated_at = Utc::now();
    state.storage.update_bug(&bug).await?;

    match format {
        ResponseFormat::Json => Ok(StatusCode::NO_CONTENT.into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            &format!("/bugs/{id}"),
            "Bug was successfully updated.",
        )
        .into_response()),
    }
}

pub async fn destroy(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state.storage.delete_bug(id).await?;
    match format {
        ResponseFormat::Json => Ok(StatusCode::NO_CONTENT.into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            "/bugs",
            "Bug was successfully destroyed.",
        )
        .into_response()),
    }
}
