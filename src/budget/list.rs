//! The endpoint for listing budgets.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    budget::{BudgetQuery, BudgetState, BudgetsResponse, get_budgets},
    db::lock,
    extract::ApiQuery,
    user::UserID,
};

/// List the signed in user's budgets, optionally for one month or category.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<BudgetQuery>,
) -> Result<Json<BudgetsResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let budgets = get_budgets(user_id, &query, &connection)?;

    Ok(Json(BudgetsResponse { budgets }))
}
