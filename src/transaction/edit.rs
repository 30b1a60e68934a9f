//! The endpoint for updating a transaction.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    category::category_belongs_to_user,
    db::lock,
    extract::{ApiJson, ApiPath},
    transaction::{
        TransactionId, TransactionResponse, TransactionState, get_transaction,
        invalid_transaction, update_transaction,
        validate::{TransactionInput, validate_transaction_patch},
    },
    user::UserID,
};

/// Update some of the fields of one of the signed in user's transactions.
///
/// # Errors
///
/// - [Error::Validation] if no fields are given or a given field is invalid.
/// - [Error::TransactionNotFound] if the transaction does not exist or belongs to another user.
/// - [Error::InvalidCategory] if the new category does not exist or belongs to another user.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<Json<TransactionResponse>, Error> {
    let patch = validate_transaction_patch(input).map_err(invalid_transaction)?;

    let connection = lock(&state.db_connection)?;
    let existing = get_transaction(transaction_id, user_id, &connection)?;

    if let Some(category_id) = patch.category_id
        && category_id != existing.category_id
        && !category_belongs_to_user(category_id, user_id, &connection)?
    {
        return Err(Error::InvalidCategory(Some(category_id)));
    }

    let transaction = update_transaction(transaction_id, user_id, &patch, &connection)?;

    Ok(Json(TransactionResponse { transaction }))
}
