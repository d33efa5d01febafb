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

async fn create_user(app: &Router, name: &str) -> Result<String> {
    let (status, body) = request_json(app, "POST", "/users", Some(json!({"name": name}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn test_bug_create_returns_201_with_resource() -> Result<()> {
    let (app, _storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;

    let (status, body) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Crash on save");
    assert_eq!(body["reporter_id"], reporter_id.as_str());
    assert!(body["assignee_id"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_bug_create_without_required_fields_is_422() -> Result<()> {
    let (app, storage) = test_app();

    let (status, body) = request_json(&app, "POST", "/bugs", Some(json!({}))).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["title"][0], "can't be blank");
    assert_eq!(body["description"][0], "can't be blank");
    assert_eq!(body["reporter_id"][0], "can't be blank");
    assert!(storage.get_all_bugs(None, None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_bug_create_with_unknown_reporter_is_422() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": Uuid::new_v4().to_string(),
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reporter_id"][0], "must exist");
    Ok(())
}

#[tokio::test]
async fn test_bug_create_with_malformed_reporter_is_422() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": "not-a-uuid",
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reporter_id"][0], "is invalid");
    Ok(())
}

#[tokio::test]
async fn test_bug_update_returns_204_and_changes_record() -> Result<()> {
    let (app, _storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;
    let assignee_id = create_user(&app, "Sam").await?;

    let (_, created) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
        })),
    )
    .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &app,
        "PATCH",
        &format!("/bugs/{id}"),
        Some(json!({
            "title": "Crash on second save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
            "assignee_id": assignee_id,
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, shown) = request_json(&app, "GET", &format!("/bugs/{id}"), None).await?;
    assert_eq!(shown["title"], "Crash on second save");
    assert_eq!(shown["assignee_id"], assignee_id.as_str());
    Ok(())
}

#[tokio::test]
async fn test_deleting_bug_cascades_to_comments() -> Result<()> {
    let (app, storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;

    let (_, created) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
        })),
    )
    .await?;
    let id = created["id"].as_str().unwrap().to_string();
    let bug_id = Uuid::parse_str(&id)?;

    let (status, comment) = request_json(
        &app,
        "POST",
        &format!("/bugs/{id}/comments"),
        Some(json!({"body": "Can reproduce", "author_id": reporter_id})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["body"], "Can reproduce");

    let (status, _) = request_json(&app, "DELETE", &format!("/bugs/{id}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(storage.get_bug_by_id(bug_id).await?.is_none());
    assert!(storage.get_comments_by_bug_id(bug_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_comment_on_unknown_bug_is_404() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/bugs/{}/comments", Uuid::new_v4()),
        Some(json!({"body": "hello"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_empty_comment_is_422() -> Result<()> {
    let (app, _storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;

    let (_, created) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
        })),
    )
    .await?;
    let id = created["id"].as_str().unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/bugs/{id}/comments"),
        Some(json!({"body": ""})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["body"][0], "can't be blank");
    Ok(())
}

#[tokio::test]
async fn test_user_create_without_name_is_422() -> Result<()> {
    let (app, _storage) = test_app();

    let (status, body) = request_json(&app, "POST", "/users", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["name"][0], "can't be blank");
    Ok(())
}

#[tokio::test]
async fn test_html_bug_show_renders_comments() -> Result<()> {
    let (app, _storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;

    let (_, created) = request_json(
        &app,
        "POST",
        "/bugs",
        Some(json!({
            "title": "Crash on save",
            "description": "Saving twice crashes",
            "reporter_id": reporter_id,
        })),
    )
    .await?;
    let id = created["id"].as_str().unwrap();

    request_json(
        &app,
        "POST",
        &format!("/bugs/{id}/comments"),
        Some(json!({"body": "Can reproduce", "author_id": reporter_id})),
    )
    .await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/bugs/{id}"))
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let html = String::from_utf8(bytes.to_vec())?;
    assert!(html.contains("Crash on save"));
    assert!(html.contains("Can reproduce"));
    assert!(html.contains("Reported by Mat"));
    Ok(())
}

#[tokio::test]
async fn test_html_bug_form_post_redirects_with_notice() -> Result<()> {
    let (app, _storage) = test_app();
    let reporter_id = create_user(&app, "Mat").await?;

    let form = format!(
        "title=Crash+on+save&description=Saving+twice+crashes&reporter_id={reporter_id}&assignee_id="
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bugs")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(location.starts_with("/bugs/"));
    assert!(location.contains("notice=Bug+was+successfully+created."));
    Ok(())
}
