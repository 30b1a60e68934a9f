//! The endpoint for fetching a single transaction.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    db::lock,
    extract::ApiPath,
    transaction::{TransactionId, TransactionResponse, TransactionState, get_transaction},
    user::UserID,
};

/// Get one of the signed in user's transactions.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another user.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<TransactionResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(TransactionResponse { transaction }))
}
