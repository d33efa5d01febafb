use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bugbook_core::storage::{InMemoryStorage, Storage};
use bugbook_web::router::app_router;
use bugbook_web::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let app = app_router(AppState {
        storage: storage.clone(),
    });
    (app, storage)
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn test_json_create_returns_201_with_resource() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/contacts",
        Some(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["id"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_json_create_without_name_returns_422_and_persists_nothing() -> Result<()> {
    let (app, storage) = test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/contacts",
        Some(json!({"email": "nobody@example.com"})),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["name"][0], "can't be blank");
    assert!(storage.get_all_contacts(None, None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_json_index_lists_created_contacts() -> Result<()> {
    let (app, _storage) = test_app();

    for name in ["Bob", "Alice"] {
        request_json(&app, "POST", "/contacts", Some(json!({"name": name}))).await?;
    }

    let (status, body) = request_json(&app, "GET", "/contacts", None).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
    Ok(())
}

#[tokio::test]
async fn test_json_show_unknown_contact_is_404() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, body) =
        request_json(&app, "GET", &format!("/contacts/{}", Uuid::new_v4()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "contact not found");
    Ok(())
}

#[tokio::test]
async fn test_json_update_returns_204_and_changes_record() -> Result<()> {
    let (app, _storage) = test_app();

    let (_, created) =
        request_json(&app, "POST", "/contacts", Some(json!({"name": "Ada"}))).await?;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &app,
        "PATCH",
        &format!("/contacts/{id}"),
        Some(json!({"name": "Ada Lovelace"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, shown) = request_json(&app, "GET", &format!("/contacts/{id}"), None).await?;
    assert_eq!(shown["name"], "Ada Lovelace");
    Ok(())
}

#[tokio::test]
async fn test_json_delete_cascades_to_phones() -> Result<()> {
    let (app, storage) = test_app();

    let (_, created) =
        request_json(&app, "POST", "/contacts", Some(json!({"name": "Ada"}))).await?;
    let id = created["id"].as_str().unwrap().to_string();
    let contact_id = Uuid::parse_str(&id)?;

    let (status, phone) = request_json(
        &app,
        "POST",
        &format!("/contacts/{id}/phones"),
        Some(json!({"number": "555-0100"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(phone["number"], "555-0100");

    let (status, _) = request_json(&app, "DELETE", &format!("/contacts/{id}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(storage.get_contact_by_id(contact_id).await?.is_none());
    assert!(storage
        .get_phones_by_contact_id(contact_id)
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_phone_create_under_unknown_contact_is_404() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/contacts/{}/phones", Uuid::new_v4()),
        Some(json!({"number": "555-0100"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_phone_create_without_number_is_422() -> Result<()> {
    let (app, _storage) = test_app();

    let (_, created) =
        request_json(&app, "POST", "/contacts", Some(json!({"name": "Ada"}))).await?;
    let id = created["id"].as_str().unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/contacts/{id}/phones"),
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["number"][0], "can't be blank");
    Ok(())
}

#[tokio::test]
async fn test_html_form_create_redirects_with_notice() -> Result<()> {
    let (app, _storage) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contacts")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=Ada+Lovelace&email="))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(location.starts_with("/contacts/"));
    assert!(location.contains("notice=Contact+was+successfully+created."));
    Ok(())
}

#[tokio::test]
async fn test_html_form_create_without_name_rerenders_form() -> Result<()> {
    let (app, storage) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contacts")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=&email=x%40example.com"))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = response.into_body().collect().await?.to_bytes();
    let html = String::from_utf8(bytes.to_vec())?;
    assert!(html.contains("can't be blank"));
    assert!(html.contains("x@example.com"));
    assert!(storage.get_all_contacts(None, None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_html_index_renders_contact_names() -> Result<()> {
    let (app, _storage) = test_app();
    request_json(&app, "POST", "/contacts", Some(json!({"name": "Ada"}))).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/contacts")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let html = String::from_utf8(bytes.to_vec())?;
    assert!(html.contains("<h1>Contacts</h1>"));
    assert!(html.contains("Ada"));
    Ok(())
}

#[tokio::test]
async fn test_format_query_param_selects_json() -> Result<()> {
    let (app, _storage) = test_app();
    request_json(&app, "POST", "/contacts", Some(json!({"name": "Ada"}))).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/contacts?format=json")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let value: Value = serde_json::from_slice(&bytes)?;
    assert!(value.is_array());
    Ok(())
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (app, _storage) = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
