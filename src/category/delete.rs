//! The endpoint for deleting a category.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    category::{CategoryId, CategoryState, delete_category},
    db::lock,
    extract::ApiPath,
    user::UserID,
};

/// Delete one of the signed in user's categories.
///
/// # Errors
///
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user.
/// - [Error::CategoryInUse] if a budget or transaction is filed under the category.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = lock(&state.db_connection)?;
    delete_category(category_id, user_id, &connection)?;

    tracing::info!("User {user_id} deleted category {category_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        Reason, Status,
        csrf::CSRF_HEADER,
        endpoints::{self, format_endpoint},
        test_utils::{assert_error, create_test_category, get_test_server, sign_up},
    };

    #[tokio::test]
    async fn delete_unused_category_succeeds() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        let path = format_endpoint(endpoints::CATEGORY, category.id);

        let response = server
            .delete(&path)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        server
            .get(&path)
            .expect_failure()
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_category_with_budget_is_failed_precondition() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 50000, "month": "2024-01"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_error(&response, Status::FailedPrecondition, Reason::CategoryInUse);
    }

    #[tokio::test]
    async fn delete_category_with_transaction_is_failed_precondition() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        server
            .post(endpoints::TRANSACTIONS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 1200, "date": "2024-01-15"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_error(&response, Status::FailedPrecondition, Reason::CategoryInUse);
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;

        let response = server
            .delete(&format_endpoint(endpoints::CATEGORY, 999))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .expect_failure()
            .await;

        response.assert_status_not_found();
        assert_error(&response, Status::NotFound, Reason::CategoryNotFound);
    }
}
