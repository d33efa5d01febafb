use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{self, bugs, comments, contacts, phones, users};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    // HTML forms can only submit GET/POST, so each mutating member route also
    // accepts POST (update) and POST on :id/delete (destroy) alongside the
    // canonical verbs.
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/contacts", get(contacts::index).post(contacts::create))
        .route("/contacts/new", get(contacts::new))
        .route(
            "/contacts/:id",
            get(contacts::show)
                .patch(contacts::update)
                .put(contacts::update)
                .post(contacts::update)
                .delete(contacts::destroy),
        )
        .route("/contacts/:id/edit", get(contacts::edit))
        .route("/contacts/:id/delete", post(contacts::destroy))
        .route(
            "/contacts/:id/phones",
            get(phones::index).post(phones::create),
        )
        .route("/contacts/:id/phones/new", get(phones::new))
        .route("/contacts/:id/phones/:phone_id", delete(phones::destroy))
        .route("/contacts/:id/phones/:phone_id/delete", post(phones::destroy))
        .route("/bugs", get(bugs::index).post(bugs::create))
        .route("/bugs/new", get(bugs::new))
        .route(
            "/bugs/:id",
            get(bugs::show)
                .patch(bugs::update)
                .put(bugs::update)
                .post(bugs::update)
                .delete(bugs::destroy),
        )
        .route("/bugs/:id/edit", get(bugs::edit))
        .route("/bugs/:id/delete", post(bugs::destroy))
        .route(
            "/bugs/:id/comments",
            get(comments::index).post(comments::create),
        )
        .route("/users", get(users::index).post(users::create))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}
