use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::convert::Infallible;

/// Which representation the client asked for.
///
/// `?format=json` wins, then an `Accept` header naming `application/json`,
/// then `text/html`; a JSON request body implies a JSON response when the
/// client expressed no preference. Browsers send `text/html` first, so plain
/// page loads stay HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

#[async_trait]
impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if parts
            .uri
            .query()
            .is_some_and(|q| q.split('&').any(|pair| pair == "format=json"))
        {
            return Ok(Self::Json);
        }

        let accept = header_value(parts, header::ACCEPT);
        if accept.contains("application/json") {
            return Ok(Self::Json);
        }
        if accept.contains("text/html") {
            return Ok(Self::Html);
        }

        if header_value(parts, header::CONTENT_TYPE).starts_with("application/json") {
            return Ok(Self::Json);
        }
        Ok(Self::Html)
    }
}

fn header_value(parts: &Parts, name: header::HeaderName) -> String {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Accepts a request body as either a urlencoded form or JSON, keyed off the
/// Content-Type, so one handler serves browser forms and API clients alike.
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S>,
    Form<T>: FromRequest<S>,
    T: 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}
