//! The endpoint for creating a budget.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error,
    budget::{
        BudgetResponse, BudgetState, budget_exists, create_budget, invalid_budget,
        validate::{BudgetInput, validate_new_budget},
    },
    category::category_belongs_to_user,
    db::lock,
    extract::ApiJson,
    user::UserID,
};

/// Create a budget for one of the signed in user's categories.
///
/// # Errors
///
/// - [Error::Validation] with every field that failed validation.
/// - [Error::InvalidCategory] if the category does not exist or belongs to another user.
/// - [Error::BudgetAlreadyExists] if the category already has a budget for the month.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(input): ApiJson<BudgetInput>,
) -> Result<(StatusCode, Json<BudgetResponse>), Error> {
    let new_budget = validate_new_budget(input).map_err(invalid_budget)?;

    let connection = lock(&state.db_connection)?;

    if !category_belongs_to_user(new_budget.category_id, user_id, &connection)? {
        return Err(Error::InvalidCategory(Some(new_budget.category_id)));
    }

    if budget_exists(
        user_id,
        new_budget.category_id,
        &new_budget.month,
        None,
        &connection,
    )? {
        return Err(Error::BudgetAlreadyExists);
    }

    let budget = create_budget(user_id, &new_budget, &connection)?;

    Ok((StatusCode::CREATED, Json(BudgetResponse { budget })))
}

#[cfg(test)]
mod create_budget_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        Reason, Status,
        budget::BudgetResponse,
        csrf::CSRF_HEADER,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_error, assert_invalid_fields, create_test_category, get_test_server, sign_up,
        },
    };

    #[tokio::test]
    async fn create_budget_round_trips() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;

        let response = server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 50000, "month": "2024-01"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created = response.json::<BudgetResponse>().budget;
        assert_eq!(created.category_id, category.id);
        assert_eq!(created.category, category);
        assert_eq!(created.amount, 50000);
        assert_eq!(created.month, "2024-01");

        let fetched = server
            .get(&format_endpoint(endpoints::BUDGET, created.id))
            .await
            .json::<BudgetResponse>()
            .budget;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_budget_is_conflict_every_time() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;
        let body = json!({"categoryId": category.id, "amount": 50000, "month": "2024-01"});
        server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        for _ in 0..3 {
            let response = server
                .post(endpoints::BUDGETS)
                .add_header(CSRF_HEADER, csrf_token.as_str())
                .json(&body)
                .expect_failure()
                .await;

            response.assert_status(StatusCode::CONFLICT);
            assert_error(&response, Status::AlreadyExists, Reason::BudgetAlreadyExists);
        }
    }

    #[tokio::test]
    async fn invalid_budget_reports_budget_reason() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": 1, "amount": 0, "month": "2024-13"}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let envelope = assert_error(
            &response,
            Status::InvalidArgument,
            Reason::InvalidBudgetAmount,
        );
        assert_invalid_fields(&envelope, &["amount", "month"]);
    }

    #[tokio::test]
    async fn other_users_category_is_not_found() {
        let server = get_test_server();
        let csrf_token = sign_up(&server, "alice@example.com").await;
        let category = create_test_category(&server, &csrf_token, "Food", "expense").await;

        let csrf_token = sign_up(&server, "bob@example.com").await;
        let response = server
            .post(endpoints::BUDGETS)
            .add_header(CSRF_HEADER, csrf_token.as_str())
            .json(&json!({"categoryId": category.id, "amount": 50000, "month": "2024-01"}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_error(&response, Status::InvalidArgument, Reason::CategoryNotFound);
    }
}
