//! The endpoint the client polls to find out whether its session is still valid.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    auth::get_token_from_cookies,
    db::lock,
    user::{SignedInResponse, UserState, get_user_by_id},
};

/// Report whether the request carries a valid auth token for an existing user.
///
/// This endpoint never responds with [Error::Unauthenticated], a missing or
/// stale token is reported as not signed in.
pub async fn check_signed_in_endpoint(
    State(state): State<UserState>,
    jar: PrivateCookieJar,
) -> Result<Json<SignedInResponse>, Error> {
    let Ok(token) = get_token_from_cookies(&jar) else {
        return Ok(Json(SignedInResponse {
            is_signed_in: false,
        }));
    };

    let connection = lock(&state.db_connection)?;
    let is_signed_in = get_user_by_id(token.user_id, &connection)?.is_some();

    Ok(Json(SignedInResponse { is_signed_in }))
}
