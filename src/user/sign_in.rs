//! The sign-in endpoint.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error, Reason,
    auth::set_auth_cookie,
    db::lock,
    extract::ApiJson,
    user::{
        MessageResponse, UserState, get_user_by_email,
        validate::{SignInInput, validate_sign_in},
    },
};

/// Check the user's credentials and set the auth cookie.
///
/// An unknown email address and a wrong password give the same error, so the
/// response does not reveal which email addresses are registered.
///
/// # Errors
///
/// - [Error::Validation] if the email or password are missing.
/// - [Error::InvalidCredentials] if the email or password are incorrect.
pub async fn sign_in_endpoint(
    State(state): State<UserState>,
    jar: PrivateCookieJar,
    ApiJson(input): ApiJson<SignInInput>,
) -> Result<(PrivateCookieJar, Json<MessageResponse>), Error> {
    let sign_in = validate_sign_in(input).map_err(|fields| Error::Validation {
        reason: Reason::ValidationError,
        fields,
    })?;

    let user = {
        let connection = lock(&state.db_connection)?;
        get_user_by_email(&sign_in.email, &connection)?
    };

    let user = match user {
        Some(user) if user.password_hash.verify(&sign_in.password)? => user,
        _ => return Err(Error::InvalidCredentials),
    };

    let jar = set_auth_cookie(jar, user.id, &state.cookie_settings)?;

    Ok((jar, Json(MessageResponse::new("Signed in successfully."))))
}
