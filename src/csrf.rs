//! Protection against cross-site request forgery.
//!
//! The client fetches a token from [get_csrf_token], which also stores it in a
//! private cookie, and echoes it back in the [CSRF_HEADER] header on every
//! state changing request. [csrf_guard] rejects requests where the two differ.
//! A forged cross-site request carries the cookie but cannot read the token.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{AppState, Error, auth::CookieSettings};

/// The name of the cookie that holds the expected token.
pub const CSRF_COOKIE: &str = "csrf";
/// The request header the client copies the token into.
pub const CSRF_HEADER: &str = "x-csrf-token";
/// How long a token stays valid.
pub const CSRF_TOKEN_DURATION: Duration = Duration::hours(1);

const CSRF_TOKEN_BYTES: usize = 32;

/// The state needed for issuing and checking anti-forgery tokens.
#[derive(Clone)]
pub struct CsrfState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The attributes of the cookies set by the server.
    pub cookie_settings: CookieSettings,
}

impl FromRef<AppState> for CsrfState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_settings: state.cookie_settings,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<CsrfState> for Key {
    fn from_ref(state: &CsrfState) -> Self {
        state.cookie_key.clone()
    }
}

/// The body of a `GET /csrf` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// Issue an anti-forgery token.
///
/// The token in the caller's cookie is handed back while it is still alive,
/// so that several tabs of the client can share one token.
pub async fn get_csrf_token(
    State(state): State<CsrfState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<CsrfTokenResponse>) {
    let csrf_token = match jar.get(CSRF_COOKIE) {
        Some(cookie) if !cookie.value_trimmed().is_empty() => cookie.value_trimmed().to_owned(),
        _ => generate_csrf_token(),
    };

    let jar = jar.add(state.cookie_settings.build_cookie(
        CSRF_COOKIE,
        csrf_token.clone(),
        CSRF_TOKEN_DURATION,
    ));

    (jar, Json(CsrfTokenResponse { csrf_token }))
}

/// Middleware that checks the anti-forgery token of every POST, PUT, PATCH
/// and DELETE request and returns [Error::InvalidCsrfToken] on a mismatch.
pub async fn csrf_guard(State(state): State<CsrfState>, request: Request, next: Next) -> Response {
    if !is_state_changing(request.method()) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::<Key>::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}.");
            return Error::InvalidCsrfToken.into_response();
        }
    };

    let is_valid = match (jar.get(CSRF_COOKIE), header_token(&parts.headers)) {
        (Some(expected), Some(provided)) => {
            !provided.is_empty() && tokens_match(expected.value_trimmed(), provided)
        }
        _ => false,
    };

    if !is_valid {
        tracing::warn!(
            "Rejected {} {} with a missing or invalid CSRF token.",
            parts.method,
            parts.uri.path()
        );
        return Error::InvalidCsrfToken.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn header_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two tokens in time that depends only on their lengths.
fn tokens_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.len() != provided.len() {
        return false;
    }

    expected
        .iter()
        .zip(provided)
        .fold(0u8, |difference, (a, b)| difference | (a ^ b))
        == 0
}
