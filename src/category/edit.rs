//! The endpoint for updating a category.

use axum::{Extension, Json, extract::State};

use crate::{
    Error, Reason,
    category::{
        CategoryId, CategoryResponse, CategoryState, update_category,
        validate::{CategoryInput, validate_category_patch},
    },
    db::lock,
    extract::{ApiJson, ApiPath},
    user::UserID,
};

/// Update some of the fields of one of the signed in user's categories.
///
/// # Errors
///
/// - [Error::Validation] if no fields are given or a given field is invalid.
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<CategoryResponse>, Error> {
    let patch = validate_category_patch(input).map_err(|fields| Error::Validation {
        reason: Reason::ValidationError,
        fields,
    })?;

    let connection = lock(&state.db_connection)?;
    let category = update_category(category_id, user_id, &patch, &connection)?;

    Ok(Json(CategoryResponse { category }))
}
