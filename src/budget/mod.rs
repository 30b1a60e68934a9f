//! Monthly budgets per category.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod list;
mod validate;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, FieldErrors, Reason};

pub use create::create_budget_endpoint;
pub use db::{
    BudgetQuery, budget_exists, create_budget, create_budget_table, delete_budget, get_budget,
    get_budgets, update_budget,
};
pub use delete::delete_budget_endpoint;
pub use domain::{Budget, BudgetId, BudgetResponse, BudgetsResponse};
pub use edit::update_budget_endpoint;
pub use get::get_budget_endpoint;
pub use list::list_budgets_endpoint;
pub use validate::{BudgetPatch, NewBudget};

/// The state needed by the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Budget payloads report validation failures with their own reason.
fn invalid_budget(fields: FieldErrors) -> Error {
    Error::Validation {
        reason: Reason::InvalidBudgetAmount,
        fields,
    }
}
