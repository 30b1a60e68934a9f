//! The endpoint for fetching a single category.

use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    category::{CategoryId, CategoryResponse, CategoryState, get_category},
    db::lock,
    extract::ApiPath,
    user::UserID,
};

/// Get one of the signed in user's categories.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or belongs to another user.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Json<CategoryResponse>, Error> {
    let connection = lock(&state.db_connection)?;
    let category = get_category(category_id, user_id, &connection)?;

    Ok(Json(CategoryResponse { category }))
}
