use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use bugbook_core::domain::{FieldErrors, UserParams};
use bugbook_core::storage::Storage;

use crate::error::ApiError;
use crate::extract::{FormOrJson, ResponseFormat};
use crate::handlers::{invalid, redirect_with_notice};
use crate::models::{NoticeQuery, WebUser};
use crate::state::AppState;
use crate::templates::UsersIndexTemplate;

async fn index_template(
    state: &AppState,
    params: &UserParams,
    errors: FieldErrors,
    notice: Option<String>,
) -> Result<UsersIndexTemplate, ApiError> {
    let users = state.storage.get_all_users().await?;
    Ok(UsersIndexTemplate::new(
        users.iter().map(WebUser::from).collect(),
        params,
        errors,
        notice,
    ))
}

pub async fn index(
    State(state): State<AppState>,
    format: ResponseFormat,
    Query(flash): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    match format {
        ResponseFormat::Json => {
            let users = state.storage.get_all_users().await?;
            Ok(Json(users).into_response())
        }
        ResponseFormat::Html => {
            let template = index_template(
                &state,
                &UserParams::default(),
                FieldErrors::default(),
                flash.notice,
            )
            .await?;
            Ok(Html(template.render().expect("Template rendering failed")).into_response())
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    format: ResponseFormat,
    FormOrJson(params): FormOrJson<UserParams>,
) -> Result<Response, ApiError> {
    match params.clone().into_user() {
        Err(errors) => {
            let template = index_template(&state, &params, errors.clone(), None).await?;
            Ok(invalid(format, template, errors))
        }
        Ok(mut user) => {
            state.storage.create_user(&mut user).await?;
            match format {
                ResponseFormat::Json => Ok((StatusCode::CREATED, Json(user)).into_response()),
                ResponseFormat::Html => {
                    Ok(redirect_with_notice("/users", "User was successfully created.")
                        .into_response())
                }
            }
        }
    }
}
