//! Budget Calendar is a JSON API for tracking personal finances.
//!
//! Users sign up and sign in with an email address and password. Once signed
//! in, they can manage income and expense categories, set a monthly budget per
//! category and record the transactions that happened on each day.
//!
//! Every request payload is validated field by field, and every failure is
//! returned in the same error envelope, see [ErrorEnvelope].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod category;
mod csrf;
mod db;
mod endpoints;
mod envelope;
mod extract;
mod logging;
mod routing;
mod transaction;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::CookieSettings;
pub use db::initialize as initialize_db;
pub use envelope::{ERROR_DOMAIN, ErrorEnvelope, Reason, Status};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{build_router, cors_layer};
pub use user::{PasswordHash, User, UserID};
pub use validation::{Field, FieldErrors};

use crate::category::CategoryId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every variant has exactly one response in [ErrorEnvelope].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of the request payload failed validation.
    ///
    /// `reason` is the reason code for the kind of payload that was rejected.
    #[error("invalid input: {fields}")]
    Validation {
        /// The reason code reported to the client.
        reason: Reason,
        /// The message for each field that failed validation.
        fields: FieldErrors,
    },

    /// The request body, query string or path parameters could not be parsed.
    ///
    /// The string is the parser's explanation and is only logged.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A category referenced by a budget or transaction does not exist or
    /// belongs to another user.
    #[error("the category ID {0:?} does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The category in the request path could not be found.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// The budget in the request path could not be found.
    #[error("the budget could not be found")]
    BudgetNotFound,

    /// The transaction in the request path could not be found.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// The user already has a budget for the category and month.
    #[error("a budget already exists for the category and month")]
    BudgetAlreadyExists,

    /// Another user has already registered the email address.
    #[error("the email address is already registered")]
    EmailAlreadyExists,

    /// The category cannot be deleted while budgets or transactions refer to it.
    #[error("the category is referenced by budgets or transactions")]
    CategoryInUse,

    /// The email address or password used to sign in is incorrect.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request has no valid auth token.
    #[error("the request is not authenticated")]
    Unauthenticated,

    /// The anti-forgery header is missing or does not match the cookie.
    #[error("the CSRF token is missing or invalid")]
    InvalidCsrfToken,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user.email") =>
            {
                Error::EmailAlreadyExists
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("budget.") =>
            {
                Error::BudgetAlreadyExists
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope::from_error(&self);
        let status = envelope::classify(&self).http_status;

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(envelope)).into_response()
    }
}
