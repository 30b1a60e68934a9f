//! The endpoint for creating a category.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error, Reason,
    category::{
        CategoryResponse, CategoryState, create_category,
        validate::{CategoryInput, validate_new_category},
    },
    db::lock,
    extract::ApiJson,
    user::UserID,
};

/// Create a category for the signed in user.
///
/// # Errors
///
/// Returns [Error::Validation] with every field that failed validation.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), Error> {
    let new_category = validate_new_category(input).map_err(|fields| Error::Validation {
        reason: Reason::ValidationError,
        fields,
    })?;

    let connection = lock(&state.db_connection)?;
    let category = create_category(user_id, &new_category, &connection)?;

    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}
