//! The endpoint for deleting a budget.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    budget::{BudgetId, BudgetState, delete_budget},
    db::lock,
    extract::ApiPath,
    user::UserID,
};

/// Delete one of the signed in user's budgets.
///
/// # Errors
///
/// Returns [Error::BudgetNotFound] if the budget does not exist or belongs to another user.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(budget_id): ApiPath<BudgetId>,
) -> Result<StatusCode, Error> {
    let connection = lock(&state.db_connection)?;
    delete_budget(budget_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_budget_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        Reason, Status,
        budget::BudgetResponse,
        csrf::CSRF_HEADER,
        endpoints::{self, format_endpoint},
        test_utils::{assert_error, create_test_category, get_test_server, sign_up},
    };

    #[tokio::test]
    async fn deleted_budget_frees_its_category() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        let budget = server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 1000, "month": "2024-01"}))
            .await
            .json::<BudgetResponse>()
            .budget;

        server
            .delete(&format_endpoint(endpoints::BUDGET, budget.id))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_other_users_budget_is_not_found() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        let budget = server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 1000, "month": "2024-01"}))
            .await
            .json::<BudgetResponse>()
            .budget;

        let csrf_token = sign_up(&server, "bob@example.com").await;
        let response = server
            .delete(&format_endpoint(endpoints::BUDGET, budget.id))
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .expect_failure()
            .await;

        response.assert_status_not_found();
        assert_error(&response, Status::NotFound, Reason::BudgetNotFound);
    }
}
