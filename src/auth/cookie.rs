//! Defines functions for handling user authentication with cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Token, user::UserID};

/// The name of the cookie that holds the auth [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(24);

/// The attributes shared by every cookie the server sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// How long auth cookies are valid for.
    pub duration: Duration,
    /// Whether cookies are restricted to HTTPS.
    ///
    /// Secure cookies are also sent on cross-site requests (`SameSite=None`)
    /// so that a client served from another origin can use the API.
    pub secure: bool,
}

impl CookieSettings {
    /// Settings for a production deployment behind HTTPS.
    pub fn production() -> Self {
        Self {
            duration: DEFAULT_COOKIE_DURATION,
            secure: true,
        }
    }

    /// Settings for local development over plain HTTP.
    pub fn development() -> Self {
        Self {
            duration: DEFAULT_COOKIE_DURATION,
            secure: false,
        }
    }

    fn same_site(&self) -> SameSite {
        if self.secure {
            SameSite::None
        } else {
            SameSite::Lax
        }
    }

    /// Build an HTTP only cookie for the whole site with these settings applied.
    pub(crate) fn build_cookie(
        &self,
        name: &'static str,
        value: String,
        max_age: Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .expires(OffsetDateTime::now_utc() + max_age)
            .http_only(true)
            .same_site(self.same_site())
            .secure(self.secure)
            .build()
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::development()
    }
}

/// Add an auth cookie to the cookie jar, indicating that a user is signed in and authenticated.
///
/// The token in the cookie expires `settings.duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    settings: &CookieSettings,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + settings.duration;
    let token = Token {
        user_id,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(settings.build_cookie(COOKIE_TOKEN, token_string, settings.duration)))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(
    jar: PrivateCookieJar,
    settings: &CookieSettings,
) -> PrivateCookieJar {
    let mut cookie = settings.build_cookie(COOKIE_TOKEN, "deleted".to_owned(), Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);

    jar.add(cookie)
}

/// Read the auth token from `jar`.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the cookie is missing, could not be
/// decrypted, does not hold a token or the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthenticated)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::Unauthenticated)?;

    if token.is_live(OffsetDateTime::now_utc()) {
        Ok(token)
    } else {
        Err(Error::Unauthenticated)
    }
}
