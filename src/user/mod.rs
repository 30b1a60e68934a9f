//! User accounts: signing up, signing in and out, and checking the session.

mod check_signed_in;
mod db;
mod domain;
mod password;
mod sign_in;
mod sign_out;
mod sign_up;
mod validate;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;

use crate::{AppState, auth::CookieSettings};

pub use check_signed_in::check_signed_in_endpoint;
pub use db::{create_user, create_user_table, email_exists, get_user_by_email, get_user_by_id};
pub use domain::{MessageResponse, SignedInResponse, User, UserID};
pub use password::{PASSWORD_HASH_COST, PasswordHash};
pub use sign_in::sign_in_endpoint;
pub use sign_out::sign_out_endpoint;
pub use sign_up::sign_up_endpoint;

/// The state needed by the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The attributes and lifetime of the auth cookie.
    pub cookie_settings: CookieSettings,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_settings: state.cookie_settings,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<UserState> for Key {
    fn from_ref(state: &UserState) -> Self {
        state.cookie_key.clone()
    }
}
