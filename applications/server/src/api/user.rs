/// Per-user library API routes
///
/// Always scoped to the authenticated account.
use crate::{
    api::{ApiResponse, ApiResult},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::{Favorite, HistoryEntry, MusicId, MyListEntry, Page, PageRequest};
use cadence_storage::{favorites, history, my_list};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicRef {
    pub music_id: MusicId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub music_id: MusicId,
    pub present: bool,
}

/// GET /api/user/favorites
pub async fn list_favorites(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<Favorite>> {
    let favorites = favorites::list(app_state.db.pool(), auth.account_id(), page).await?;
    Ok(ApiResponse::ok("Favorites retrieved successfully", favorites))
}

/// POST /api/user/favorites
pub async fn add_favorite(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<MusicRef>,
) -> ApiResult<Favorite> {
    let favorite = favorites::add(app_state.db.pool(), auth.account_id(), req.music_id).await?;
    Ok(ApiResponse::ok("Added to favorites successfully", favorite))
}

/// DELETE /api/user/favorites/:music_id
pub async fn remove_favorite(
    Path(music_id): Path<MusicId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    favorites::remove(app_state.db.pool(), auth.account_id(), music_id).await?;
    Ok(ApiResponse::message("Removed from favorites successfully"))
}

/// GET /api/user/favorites/check/:music_id
pub async fn check_favorite(
    Path(music_id): Path<MusicId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<Membership> {
    let present = favorites::exists(app_state.db.pool(), auth.account_id(), music_id).await?;
    Ok(ApiResponse::ok(
        "Favorite status checked",
        Membership { music_id, present },
    ))
}

/// GET /api/user/recently-played
pub async fn recently_played(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<HistoryEntry>> {
    let plays = history::list(app_state.db.pool(), auth.account_id(), page).await?;
    Ok(ApiResponse::ok("Recently played retrieved successfully", plays))
}

/// POST /api/user/recently-played
pub async fn add_recently_played(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<MusicRef>,
) -> ApiResult<HistoryEntry> {
    let entry = history::record(app_state.db.pool(), auth.account_id(), req.music_id).await?;
    Ok(ApiResponse::ok("Added to recently played successfully", entry))
}

/// GET /api/user/my-list
pub async fn my_list(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<Vec<MyListEntry>> {
    let entries = my_list::list(app_state.db.pool(), auth.account_id()).await?;
    Ok(ApiResponse::ok("My list retrieved successfully", entries))
}

/// POST /api/user/my-list
pub async fn add_to_my_list(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<MusicRef>,
) -> ApiResult<MyListEntry> {
    let entry = my_list::add(app_state.db.pool(), auth.account_id(), req.music_id).await?;
    Ok(ApiResponse::ok("Added to my list successfully", entry))
}

/// DELETE /api/user/my-list/:music_id
pub async fn remove_from_my_list(
    Path(music_id): Path<MusicId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    my_list::remove(app_state.db.pool(), auth.account_id(), music_id).await?;
    Ok(ApiResponse::message("Removed from my list successfully"))
}

/// GET /api/user/my-list/check/:music_id
pub async fn check_my_list(
    Path(music_id): Path<MusicId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<Membership> {
    let present = my_list::exists(app_state.db.pool(), auth.account_id(), music_id).await?;
    Ok(ApiResponse::ok(
        "My list status checked",
        Membership { music_id, present },
    ))
}
