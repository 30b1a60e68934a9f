//! The endpoint for recording a transaction.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error,
    category::category_belongs_to_user,
    db::lock,
    extract::ApiJson,
    transaction::{
        TransactionResponse, TransactionState, create_transaction, invalid_transaction,
        validate::{TransactionInput, validate_new_transaction},
    },
    user::UserID,
};

/// Record a transaction in one of the signed in user's categories.
///
/// # Errors
///
/// - [Error::Validation] with every field that failed validation.
/// - [Error::InvalidCategory] if the category does not exist or belongs to another user.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<(StatusCode, Json<TransactionResponse>), Error> {
    let new_transaction = validate_new_transaction(input).map_err(invalid_transaction)?;

    let connection = lock(&state.db_connection)?;

    if !category_belongs_to_user(new_transaction.category_id, user_id, &connection)? {
        return Err(Error::InvalidCategory(Some(new_transaction.category_id)));
    }

    let transaction = create_transaction(user_id, &new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}
