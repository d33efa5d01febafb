use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use bugbook_core::domain::{ContactParams, FieldErrors};
use bugbook_core::storage::Storage;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{FormOrJson, ResponseFormat};
use crate::handlers::{invalid, redirect_with_notice};
use crate::models::{ListQuery, NoticeQuery, WebContact, WebPhone};
use crate::state::AppState;
use crate::templates::{
    ContactShowTemplate, ContactsIndexTemplate, EditContactTemplate, NewContactTemplate,
};

pub async fn index(
    State(state): State<AppState>,
    format: ResponseFormat,
    Query(list): Query<ListQuery>,
    Query(flash): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    let contacts = state
        .storage
        .get_all_contacts(list.limit, list.offset)
        .await?;

    match format {
        ResponseFormat::Json => Ok(Json(contacts).into_response()),
        ResponseFormat::Html => {
            let template = ContactsIndexTemplate {
                contacts: contacts.iter().map(WebContact::from).collect(),
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
    let contact = state
        .storage
        .get_contact_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("contact", id))?;

    match format {
        ResponseFormat::Json => Ok(Json(contact).into_response()),
        ResponseFormat::Html => {
            let phones = state.storage.get_phones_by_contact_id(id).await?;
            let template = ContactShowTemplate {
                contact: WebContact::from(&contact),
                phones: phones.iter().map(WebPhone::from).collect(),
                notice: flash.notice,
            };
            Ok(Html(template.render().expect("Template rendering failed")).into_response())
        }
    }
}

pub async fn new() -> Html<String> {
    let template = NewContactTemplate::new(&ContactParams::default(), FieldErrors::default());
    Html(template.render().expect("Template rendering failed"))
}

pub async fn create(
    State(state): State<AppState>,
    format: ResponseFormat,
    FormOrJson(params): FormOrJson<ContactParams>,
) -> Result<Response, ApiError> {
    match params.clone().into_contact() {
        Err(errors) => Ok(invalid(
            format,
            NewContactTemplate::new(&params, errors.clone()),
            errors,
        )),
        Ok(mut contact) => {
            state.storage.create_contact(&mut contact).await?;
            let id = contact.id.unwrap_or_default();
            match format {
                ResponseFormat::Json => {
                    Ok((StatusCode::CREATED, Json(contact)).into_response())
                }
                ResponseFormat::Html => Ok(redirect_with_notice(
                    &format!("/contacts/{id}"),
                    "Contact was successfully created.",
                )
                .into_response()),
            }
        }
    }
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let contact = state
        .storage
        .get_contact_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("contact", id))?;

    let params = ContactParams {
        name: Some(contact.name),
        email: contact.email,
    };
    let template = EditContactTemplate::new(id, &params, FieldErrors::default());
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn update(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(id): Path<Uuid>,
    FormOrJson(params): FormOrJson<ContactParams>,
) -> Result<Response, ApiError> {
    let existing = state
        .storage
        .get_contact_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("contact", id))?;

    match params.clone().into_contact() {
        Err(errors) => Ok(invalid(
            format,
            EditContactTemplate::new(id, &params, errors.clone()),
            errors,
        )),
        Ok(mut contact) => {
            contact.id = Some(id);
            contact.created_at = existing.created_at;
            contact.updated_at = Utc::now();
            state.storage.update_contact(&contact).await?;
            match format {
                ResponseFormat::Json => Ok(StatusCode::NO_CONTENT.into_response()),
                ResponseFormat::Html => Ok(redirect_with_notice(
                    &format!("/contacts/{id}"),
                    "Contact was successfully updated.",
                )
                .into_response()),
            }
        }
    }
}

pub async fn destroy(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state.storage.delete_contact(id).await?;
    match format {
        ResponseFormat::Json => Ok(StatusCode::NO_CONTENT.into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            "/contacts",
            "Contact was successfully destroyed.",
        )
        .into_response()),
    }
}
