//! Core budget domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    category::{Category, CategoryId},
    user::UserID,
};

/// Database identifier for a budget.
pub type BudgetId = i64;

/// The amount a user plans to spend or earn in a category over one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserID,
    pub category_id: CategoryId,
    pub category: Category,
    /// The planned amount in the smallest unit of the currency, e.g. cents.
    pub amount: i64,
    /// The month the budget applies to, formatted as `YYYY-MM`.
    pub month: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The body of a response with a single budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub budget: Budget,
}

/// The body of a response with a list of budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetsResponse {
    pub budgets: Vec<Budget>,
}
