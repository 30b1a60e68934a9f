//! The endpoint for deleting a transaction.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    db::lock,
    extract::ApiPath,
    transaction::{TransactionId, TransactionState, delete_transaction},
    user::UserID,
};

/// Delete one of the signed in user's transactions.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another user.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = lock(&state.db_connection)?;
    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        Reason, Status,
        csrf::CSRF_HEADER,
        endpoints::{self, format_endpoint},
        test_utils::{assert_error, create_test_category, get_test_server, sign_up},
        transaction::TransactionResponse,
    };

    #[tokio::test]
    async fn delete_transaction_succeeds_once() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        let transaction = server
            .post(endpoints::TRANSACTIONS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 500, "date": "2024-01-01"}))
            .await
            .json::<TransactionResponse>()
            .transaction;
        let path = format_endpoint(endpoints::TRANSACTION, transaction.id);

        server
            .delete(&path)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server
            .delete(&path)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .expect_failure()
            .await;
        response.assert_status_not_found();
        assert_error(&response, Status::NotFound, Reason::TransactionNotFound);
    }
}
