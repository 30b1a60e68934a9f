//! The endpoint for listing transactions.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    db::lock,
    extract::ApiQuery,
    transaction::{TransactionQuery, TransactionState, TransactionsResponse, get_transactions},
    user::UserID,
};

/// List the signed in user's transactions, optionally within a date range,
/// of one category type or in one category.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<TransactionsResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let transactions = get_transactions(user_id, &query, &connection)?;

    Ok(Json(TransactionsResponse { transactions }))
}
