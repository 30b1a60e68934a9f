//! Income and expense categories that budgets and transactions are filed under.

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

use crate::AppState;

pub use create::create_category_endpoint;
pub(crate) use db::{CATEGORY_COLUMNS, map_category_row_with_offset};
pub use db::{
    category_belongs_to_user, create_category, create_category_table, delete_category,
    get_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{CategoriesResponse, Category, CategoryId, CategoryResponse, CategoryType};
pub use edit::update_category_endpoint;
pub use get::get_category_endpoint;
pub use list::list_categories_endpoint;
pub use validate::{CategoryPatch, NewCategory};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
