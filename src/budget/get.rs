//! The endpoint for fetching a single budget.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    budget::{BudgetId, BudgetResponse, BudgetState, get_budget},
    db::lock,
    extract::ApiPath,
    user::UserID,
};

/// Get one of the signed in user's budgets.
///
/// # Errors
///
/// Returns [Error::BudgetNotFound] if the budget does not exist or belongs to another user.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(budget_id): ApiPath<BudgetId>,
) -> Result<Json<BudgetResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let budget = get_budget(budget_id, user_id, &connection)?;

    Ok(Json(BudgetResponse { budget }))
}
