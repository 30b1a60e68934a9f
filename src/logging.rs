//! Middleware for logging requests and responses.

use axum::{
    body::Bytes,
    extract::Request,
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{Error, csrf::CSRF_HEADER};

/// The number of characters of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// The `password` value of a JSON request body, cookies and the anti-forgery
/// header are never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => return Error::MalformedRequest(error.to_string()).into_response(),
    };

    let display_text = if is_json(&parts.headers) {
        redact_password(&body_bytes)
    } else {
        String::from_utf8_lossy(&body_bytes).to_string()
    };
    log_request(&parts, &display_text);

    let request = Request::from_parts(parts, body_bytes.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => return Error::JSONSerializationError(error.to_string()).into_response(),
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, body_bytes.into())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

/// The body as text with the top-level `password` value masked. Bodies that
/// are not JSON objects are logged as they are.
fn redact_password(body: &Bytes) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut object)) => {
            if let Some(password) = object.get_mut("password") {
                *password = Value::String(REDACTED.to_owned());
            }

            Value::Object(object).to_string()
        }
        _ => String::from_utf8_lossy(body).to_string(),
    }
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is not longer.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

/// A copy of `headers` with the values that carry credentials masked.
fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    for name in [COOKIE, SET_COOKIE, HeaderName::from_static(CSRF_HEADER)] {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }

    headers
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let headers = redact_headers(&parts.headers);

    if let Some(truncated) = truncate(body) {
        tracing::info!(
            "Received request: {} {}\nheaders: {headers:#?}\nbody: {truncated}...",
            parts.method,
            parts.uri
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nheaders: {headers:#?}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let headers = redact_headers(&parts.headers);

    if let Some(truncated) = truncate(body) {
        tracing::info!(
            "Sending response: {}\nheaders: {headers:#?}\nbody: {truncated}...",
            parts.status
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!(
            "Sending response: {}\nheaders: {headers:#?}\nbody: {body:?}",
            parts.status
        );
    }
}
