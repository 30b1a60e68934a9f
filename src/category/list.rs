//! The endpoint for listing categories.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    category::{CategoriesResponse, CategoryState, CategoryType, get_categories},
    db::lock,
    extract::ApiQuery,
    user::UserID,
};

/// The query string of a list categories request.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// List the signed in user's categories, optionally only those of one type.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(filter): ApiQuery<CategoryFilter>,
) -> Result<Json<CategoriesResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let categories = get_categories(user_id, filter.category_type, &connection)?;

    Ok(Json(CategoriesResponse { categories }))
}
