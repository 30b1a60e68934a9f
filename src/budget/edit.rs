//! The endpoint for updating a budget.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    budget::{
        BudgetId, BudgetResponse, BudgetState, budget_exists, get_budget, invalid_budget,
        update_budget,
        validate::{BudgetInput, validate_budget_patch},
    },
    category::category_belongs_to_user,
    db::lock,
    extract::{ApiJson, ApiPath},
    user::UserID,
};

/// Update some of the fields of one of the signed in user's budgets.
///
/// Moving a budget to another category or month is checked against the
/// user's other budgets, the budget itself does not count as a duplicate.
///
/// # Errors
///
/// - [Error::Validation] if no fields are given or a given field is invalid.
/// - [Error::BudgetNotFound] if the budget does not exist or belongs to another user.
/// - [Error::InvalidCategory] if the new category does not exist or belongs to another user.
/// - [Error::BudgetAlreadyExists] if another budget has the resulting category and month.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(budget_id): ApiPath<BudgetId>,
    ApiJson(input): ApiJson<BudgetInput>,
) -> Result<Json<BudgetResponse>, Error> {
    let patch = validate_budget_patch(input).map_err(invalid_budget)?;

    let connection = lock(&state.db_connection)?;
    let existing = get_budget(budget_id, user_id, &connection)?;

    let category_id = patch.category_id.unwrap_or(existing.category_id);
    let month = patch.month.as_deref().unwrap_or(&existing.month);

    if category_id != existing.category_id
        && !category_belongs_to_user(category_id, user_id, &connection)?
    {
        return Err(Error::InvalidCategory(Some(category_id)));
    }

    if (category_id != existing.category_id || month != existing.month)
        && budget_exists(user_id, category_id, month, Some(budget_id), &connection)?
    {
        return Err(Error::BudgetAlreadyExists);
    }

    let budget = update_budget(budget_id, user_id, &patch, &connection)?;

    Ok(Json(BudgetResponse { budget }))
}
