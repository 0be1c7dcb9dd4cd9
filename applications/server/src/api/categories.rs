/// Category API routes
use crate::{
    api::{ApiResponse, ApiResult},
    error::ServerError,
    state::AppState,
};
use axum::extract::{Path, State};
use cadence_core::{Category, CategoryId};
use cadence_storage::categories;

/// GET /api/categories
pub async fn list_categories(State(app_state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = categories::get_active(app_state.db.pool()).await?;
    Ok(ApiResponse::ok("Categories loaded successfully", categories))
}

/// GET /api/categories/:id
pub async fn get_category(
    Path(id): Path<CategoryId>,
    State(app_state): State<AppState>,
) -> ApiResult<Category> {
    let category = categories::get_by_id(app_state.db.pool(), id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| ServerError::not_found(format!("Category not found: {id}")))?;
    Ok(ApiResponse::ok("Category loaded successfully", category))
}
