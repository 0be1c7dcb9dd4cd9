/// Admin API routes
///
/// Mounted behind `require_admin`; handlers assume an admin caller.
use crate::{
    api::{ApiResponse, ApiResult},
    error::ServerError,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::{
    AccountId, AccountProfile, Artist, ArtistId, ArtistStats, Category, CategoryId,
    DashboardStats, Music, MusicFilter, MusicId, NewArtist, NewCategory, NewMusic, Page,
    PageRequest, Playlist, PlaylistId, UpdateArtist, UpdateCategory, UpdateMusic,
};
use cadence_storage::{accounts, artists, categories, music, playlists, stats};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

fn require_name(name: &str, what: &str) -> Result<(), ServerError> {
    if name.trim().is_empty() {
        return Err(ServerError::bad_request(format!("{what} name must not be empty")));
    }
    Ok(())
}

// Users

/// GET /api/admin/users
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<AccountProfile>> {
    let users = accounts::list(app_state.db.pool(), page).await?;
    Ok(ApiResponse::ok("Users loaded successfully", users))
}

/// GET /api/admin/users/:id
pub async fn get_user(
    Path(id): Path<AccountId>,
    State(app_state): State<AppState>,
) -> ApiResult<AccountProfile> {
    let account = accounts::get_by_id(app_state.db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("User not found: {id}")))?;
    Ok(ApiResponse::ok("User loaded successfully", account.profile()))
}

/// PUT /api/admin/users/:id/admin
pub async fn set_admin(
    Path(id): Path<AccountId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<SetAdminRequest>,
) -> ApiResult<AccountProfile> {
    if id == auth.account_id() && !req.is_admin {
        return Err(ServerError::bad_request("You cannot remove your own admin role"));
    }

    let account = accounts::set_admin(app_state.db.pool(), id, req.is_admin).await?;
    tracing::info!(
        admin_id = auth.account_id(),
        account_id = id,
        is_admin = req.is_admin,
        "Admin role changed"
    );
    Ok(ApiResponse::ok("User updated successfully", account.profile()))
}

/// DELETE /api/admin/users/:id
pub async fn delete_user(
    Path(id): Path<AccountId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    if id == auth.account_id() {
        return Err(ServerError::bad_request("You cannot delete your own account"));
    }

    accounts::delete(app_state.db.pool(), id).await?;
    tracing::info!(admin_id = auth.account_id(), account_id = id, "Account deleted");
    Ok(ApiResponse::message("User deleted successfully"))
}

// Categories

/// GET /api/admin/categories
pub async fn list_categories(State(app_state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = categories::get_all(app_state.db.pool()).await?;
    Ok(ApiResponse::ok("Categories loaded successfully", categories))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(app_state): State<AppState>,
    Json(req): Json<NewCategory>,
) -> ApiResult<Category> {
    require_name(&req.name, "Category")?;
    let category = categories::create(app_state.db.pool(), req).await?;
    Ok(ApiResponse::ok("Category created successfully", category))
}

/// PUT /api/admin/categories/:id
pub async fn update_category(
    Path(id): Path<CategoryId>,
    State(app_state): State<AppState>,
    Json(req): Json<UpdateCategory>,
) -> ApiResult<Category> {
    if let Some(name) = &req.name {
        require_name(name, "Category")?;
    }
    let category = categories::update(app_state.db.pool(), id, req).await?;
    Ok(ApiResponse::ok("Category updated successfully", category))
}

/// DELETE /api/admin/categories/:id
pub async fn delete_category(
    Path(id): Path<CategoryId>,
    State(app_state): State<AppState>,
) -> ApiResult<()> {
    categories::delete(app_state.db.pool(), id).await?;
    Ok(ApiResponse::message("Category deleted successfully"))
}

// Artists

/// GET /api/admin/artists
pub async fn list_artists(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Page<Artist>> {
    let artists = artists::list(app_state.db.pool(), query.search.as_deref(), false, page).await?;
    Ok(ApiResponse::ok("Artists loaded successfully", artists))
}

/// GET /api/admin/artists/:id
///
/// Inactive artists are visible here.
pub async fn get_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
) -> ApiResult<Artist> {
    let artist = artists::get_by_id(app_state.db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Artist not found: {id}")))?;
    Ok(ApiResponse::ok("Artist loaded successfully", artist))
}

/// GET /api/admin/artists/:id/stats
pub async fn artist_stats(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
) -> ApiResult<ArtistStats> {
    let pool = app_state.db.pool();
    if artists::get_by_id(pool, id).await?.is_none() {
        return Err(ServerError::not_found(format!("Artist not found: {id}")));
    }
    let stats = music::artist_stats(pool, id).await?;
    Ok(ApiResponse::ok("Artist stats loaded successfully", stats))
}

/// POST /api/admin/artists
pub async fn create_artist(
    State(app_state): State<AppState>,
    Json(req): Json<NewArtist>,
) -> ApiResult<Artist> {
    require_name(&req.name, "Artist")?;
    let artist = artists::create(app_state.db.pool(), req).await?;
    Ok(ApiResponse::ok("Artist created successfully", artist))
}

/// PUT /api/admin/artists/:id
pub async fn update_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
    Json(req): Json<UpdateArtist>,
) -> ApiResult<Artist> {
    if let Some(name) = &req.name {
        require_name(name, "Artist")?;
    }
    let artist = artists::update(app_state.db.pool(), id, req).await?;
    Ok(ApiResponse::ok("Artist updated successfully", artist))
}

/// DELETE /api/admin/artists/:id
pub async fn delete_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
) -> ApiResult<()> {
    artists::delete(app_state.db.pool(), id).await?;
    Ok(ApiResponse::message("Artist deleted successfully"))
}

// Music

/// GET /api/admin/music
///
/// Includes inactive music.
pub async fn list_music(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(filter): Query<MusicFilter>,
) -> ApiResult<Page<Music>> {
    let music = music::list(app_state.db.pool(), &filter, page, false).await?;
    Ok(ApiResponse::ok("Music loaded successfully", music))
}

/// POST /api/admin/music
pub async fn create_music(
    State(app_state): State<AppState>,
    Json(req): Json<NewMusic>,
) -> ApiResult<Music> {
    if req.title.trim().is_empty() {
        return Err(ServerError::bad_request("Music title must not be empty"));
    }
    if req.file_url.trim().is_empty() {
        return Err(ServerError::bad_request("Music file URL must not be empty"));
    }
    let music = music::create(app_state.db.pool(), req).await?;
    Ok(ApiResponse::ok("Music created successfully", music))
}

/// PUT /api/admin/music/:id
pub async fn update_music(
    Path(id): Path<MusicId>,
    State(app_state): State<AppState>,
    Json(req): Json<UpdateMusic>,
) -> ApiResult<Music> {
    let music = music::update(app_state.db.pool(), id, req).await?;
    Ok(ApiResponse::ok("Music updated successfully", music))
}

/// DELETE /api/admin/music/:id
pub async fn delete_music(
    Path(id): Path<MusicId>,
    State(app_state): State<AppState>,
) -> ApiResult<()> {
    music::delete(app_state.db.pool(), id).await?;
    Ok(ApiResponse::message("Music deleted successfully"))
}

// Playlists

/// GET /api/admin/playlists
///
/// Every owner's playlists, private ones included.
pub async fn list_playlists(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Page<Playlist>> {
    let playlists =
        playlists::list_all(app_state.db.pool(), query.search.as_deref(), page).await?;
    Ok(ApiResponse::ok("Playlists loaded successfully", playlists))
}

/// DELETE /api/admin/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    playlists::delete(app_state.db.pool(), id).await?;
    tracing::info!(admin_id = auth.account_id(), playlist_id = id, "Playlist removed by admin");
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

// Dashboard

/// GET /api/admin/stats
pub async fn dashboard_stats(State(app_state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = stats::dashboard(app_state.db.pool()).await?;
    Ok(ApiResponse::ok("Dashboard stats loaded successfully", stats))
}
