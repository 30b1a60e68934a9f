//! The JSON body returned for every error response.
//!
//! Each [Error] maps to exactly one row of HTTP status, [Status], [Reason] and
//! message in [classify]. The body always has the shape
//!
//! ```json
//! {"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT",
//!   "details": [{"type": "ErrorInfo", "reason": "VALIDATION_ERROR",
//!                "domain": "budget-calendar.example.com", "metadata": {...}}]}}
//! ```
//!
//! where `metadata` only appears for validation failures.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifies this service as the source of an error detail.
pub const ERROR_DOMAIN: &str = "budget-calendar.example.com";

const INVALID_INPUT_MESSAGE: &str = "The request contains invalid input.";
const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// The canonical status of an error, independent of the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Unauthenticated,
    PermissionDenied,
    Internal,
}

/// A stable, machine-readable cause of an error that clients can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    ValidationError,
    InvalidBudgetAmount,
    InvalidAmount,
    CategoryNotFound,
    BudgetNotFound,
    TransactionNotFound,
    BudgetAlreadyExists,
    EmailAlreadyExists,
    CategoryInUse,
    InvalidCredentials,
    InvalidToken,
    InvalidCsrfToken,
    DatabaseError,
    UnknownError,
}

/// The only kind of error detail the service produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailType {
    ErrorInfo,
}

/// One detail explaining an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub detail_type: DetailType,
    pub reason: Reason,
    pub domain: String,
    /// Field name to message, only set for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// The contents of the `error` key of an error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The HTTP status code.
    pub code: u16,
    /// A message suitable for showing to the user.
    pub message: String,
    pub status: Status,
    pub details: Vec<ErrorInfo>,
}

/// An error response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// The fixed response attributes for one kind of error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub http_status: StatusCode,
    pub status: Status,
    pub reason: Reason,
    pub message: &'static str,
}

const fn row(
    http_status: StatusCode,
    status: Status,
    reason: Reason,
    message: &'static str,
) -> Classification {
    Classification {
        http_status,
        status,
        reason,
        message,
    }
}

/// Map an error to its response attributes.
///
/// Errors without a row of their own are internal errors and never expose
/// their details.
pub fn classify(error: &Error) -> Classification {
    match error {
        Error::Validation { reason, .. } => row(
            StatusCode::BAD_REQUEST,
            Status::InvalidArgument,
            *reason,
            INVALID_INPUT_MESSAGE,
        ),
        Error::MalformedRequest(_) => row(
            StatusCode::BAD_REQUEST,
            Status::InvalidArgument,
            Reason::ValidationError,
            INVALID_INPUT_MESSAGE,
        ),
        Error::InvalidCategory(_) => row(
            StatusCode::BAD_REQUEST,
            Status::InvalidArgument,
            Reason::CategoryNotFound,
            "The specified category could not be found.",
        ),
        Error::CategoryNotFound => row(
            StatusCode::NOT_FOUND,
            Status::NotFound,
            Reason::CategoryNotFound,
            "The category could not be found.",
        ),
        Error::BudgetNotFound => row(
            StatusCode::NOT_FOUND,
            Status::NotFound,
            Reason::BudgetNotFound,
            "The budget could not be found.",
        ),
        Error::TransactionNotFound => row(
            StatusCode::NOT_FOUND,
            Status::NotFound,
            Reason::TransactionNotFound,
            "The transaction could not be found.",
        ),
        Error::BudgetAlreadyExists => row(
            StatusCode::CONFLICT,
            Status::AlreadyExists,
            Reason::BudgetAlreadyExists,
            "A budget for this category already exists for this month.",
        ),
        Error::EmailAlreadyExists => row(
            StatusCode::CONFLICT,
            Status::AlreadyExists,
            Reason::EmailAlreadyExists,
            "This email address is already registered.",
        ),
        Error::CategoryInUse => row(
            StatusCode::BAD_REQUEST,
            Status::FailedPrecondition,
            Reason::CategoryInUse,
            "This category is in use and cannot be deleted.",
        ),
        Error::InvalidCredentials => row(
            StatusCode::UNAUTHORIZED,
            Status::Unauthenticated,
            Reason::InvalidCredentials,
            "The email address or password is incorrect.",
        ),
        Error::Unauthenticated => row(
            StatusCode::UNAUTHORIZED,
            Status::Unauthenticated,
            Reason::InvalidToken,
            "You must be signed in to do that.",
        ),
        Error::InvalidCsrfToken => row(
            StatusCode::FORBIDDEN,
            Status::PermissionDenied,
            Reason::InvalidCsrfToken,
            "The anti-forgery token is missing or invalid.",
        ),
        Error::HashingError(_) | Error::JSONSerializationError(_) => row(
            StatusCode::INTERNAL_SERVER_ERROR,
            Status::Internal,
            Reason::UnknownError,
            UNEXPECTED_ERROR_MESSAGE,
        ),
        Error::DatabaseLockError | Error::SqlError(_) => row(
            StatusCode::INTERNAL_SERVER_ERROR,
            Status::Internal,
            Reason::DatabaseError,
            UNEXPECTED_ERROR_MESSAGE,
        ),
    }
}

impl ErrorEnvelope {
    /// Build the response body for `error`.
    pub fn from_error(error: &Error) -> Self {
        let classification = classify(error);
        let metadata = match error {
            Error::Validation { fields, .. } => Some(fields.to_metadata()),
            _ => None,
        };

        Self {
            error: ErrorBody {
                code: classification.http_status.as_u16(),
                message: classification.message.to_owned(),
                status: classification.status,
                details: vec![ErrorInfo {
                    detail_type: DetailType::ErrorInfo,
                    reason: classification.reason,
                    domain: ERROR_DOMAIN.to_owned(),
                    metadata,
                }],
            },
        }
    }

    /// The reason of the first detail.
    pub fn reason(&self) -> Option<Reason> {
        self.error.details.first().map(|detail| detail.reason)
    }

    /// The validation metadata of the first detail.
    pub fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.error
            .details
            .first()
            .and_then(|detail| detail.metadata.as_ref())
    }
}
