//! The sign-up endpoint.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error, Reason,
    auth::set_auth_cookie,
    db::lock,
    extract::ApiJson,
    user::{
        MessageResponse, PASSWORD_HASH_COST, PasswordHash, UserState, create_user, email_exists,
        validate::{SignUpInput, validate_sign_up},
    },
};

/// Create a user and sign them in.
///
/// # Errors
///
/// - [Error::Validation] if the name, email or password are invalid.
/// - [Error::EmailAlreadyExists] if another user has the email address.
pub async fn sign_up_endpoint(
    State(state): State<UserState>,
    jar: PrivateCookieJar,
    ApiJson(input): ApiJson<SignUpInput>,
) -> Result<(PrivateCookieJar, Json<MessageResponse>), Error> {
    let sign_up = validate_sign_up(input).map_err(|fields| Error::Validation {
        reason: Reason::ValidationError,
        fields,
    })?;

    let password_hash = PasswordHash::new(&sign_up.password, PASSWORD_HASH_COST)?;

    let user = {
        let connection = lock(&state.db_connection)?;

        if email_exists(&sign_up.email, &connection)? {
            return Err(Error::EmailAlreadyExists);
        }

        create_user(&sign_up.name, &sign_up.email, password_hash, &connection)?
    };

    tracing::info!("Created user {}", user.id);

    let jar = set_auth_cookie(jar, user.id, &state.cookie_settings)?;

    Ok((jar, Json(MessageResponse::new("Signed up successfully."))))
}
