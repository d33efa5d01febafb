use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use bugbook_core::domain::{Contact, FieldErrors, PhoneParams};
use bugbook_core::storage::Storage;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{FormOrJson, ResponseFormat};
use crate::handlers::{invalid, redirect_with_notice};
use crate::models::WebContact;
use crate::state::AppState;
use crate::templates::PhoneNewTemplate;

// Every phone route hangs off a contact; an unknown parent is a 404 before
// anything else happens.
async fn load_contact(state: &AppState, contact_id: Uuid) -> Result<Contact, ApiError> {
    state
        .storage
        .get_contact_by_id(contact_id)
        .await?
        .ok_or_else(|| ApiError::not_found("contact", contact_id))
}

pub async fn index(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(contact_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    load_contact(&state, contact_id).await?;
    let phones = state.storage.get_phones_by_contact_id(contact_id).await?;

    match format {
        ResponseFormat::Json => Ok(Json(phones).into_response()),
        // Phones render on the contact page itself
        ResponseFormat::Html => Ok(Redirect::to(&format!("/contacts/{contact_id}")).into_response()),
    }
}

pub async fn new(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let contact = load_contact(&state, contact_id).await?;
    let template = PhoneNewTemplate::new(
        WebContact::from(&contact),
        &PhoneParams::default(),
        FieldErrors::default(),
    );
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn create(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path(contact_id): Path<Uuid>,
    FormOrJson(params): FormOrJson<PhoneParams>,
) -> Result<Response, ApiError> {
    let contact = load_contact(&state, contact_id).await?;

    match params.clone().into_phone(contact_id) {
        Err(errors) => Ok(invalid(
            format,
            PhoneNewTemplate::new(WebContact::from(&contact), &params, errors.clone()),
            errors,
        )),
        Ok(mut phone) => {
            state.storage.create_phone(&mut phone).await?;
            match format {
                ResponseFormat::Json => Ok((StatusCode::CREATED, Json(phone)).into_response()),
                ResponseFormat::Html => Ok(redirect_with_notice(
                    &format!("/contacts/{contact_id}"),
                    "Phone was successfully created.",
                )
                .into_response()),
            }
        }
    }
}

pub async fn destroy(
    State(state): State<AppState>,
    format: ResponseFormat,
    Path((contact_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    load_contact(&state, contact_id).await?;

    let phone = state
        .storage
        .get_phone_by_id(id)
        .await?
        .filter(|phone| phone.contact_id == contact_id)
        .ok_or_else(|| ApiError::not_found("phone", id))?;

    state.storage.delete_phone(phone.id.unwrap_or(id)).await?;
    match format {
        ResponseFormat::Json => Ok(StatusCode::NO_CONTENT.into_response()),
        ResponseFormat::Html => Ok(redirect_with_notice(
            &format!("/contacts/{contact_id}"),
            "Phone was successfully destroyed.",
        )
        .into_response()),
    }
}
