/// Playlists API routes
///
/// Reads of private playlists and every mutation are limited to the owner
/// and admins. Other readers see a private playlist as missing; other
/// writers get `Forbidden`.
use crate::{
    api::{ApiResponse, ApiResult},
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, MaybeUser},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use cadence_core::{
    Identity, MusicId, NewPlaylist, Page, PageRequest, Playlist, PlaylistEntry, PlaylistId,
    PlaylistSort, UpdatePlaylist,
};
use cadence_storage::{playlists, Database};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Load a playlist the viewer may see
async fn visible_playlist(
    db: &Database,
    id: PlaylistId,
    viewer: Option<&Identity>,
) -> Result<Playlist> {
    playlists::get_by_id(db.pool(), id)
        .await?
        .filter(|p| p.is_visible_to(viewer))
        .ok_or_else(|| ServerError::not_found(format!("Playlist not found: {id}")))
}

/// Load a playlist the caller may change
async fn modifiable_playlist(
    db: &Database,
    id: PlaylistId,
    identity: &Identity,
) -> Result<Playlist> {
    let playlist = playlists::get_by_id(db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Playlist not found: {id}")))?;
    if !playlist.is_modifiable_by(identity) {
        tracing::warn!(
            account_id = identity.id,
            playlist_id = id,
            "Playlist modification denied"
        );
        return Err(ServerError::forbidden(
            "You do not have permission to modify this playlist",
        ));
    }
    Ok(playlist)
}

/// GET /api/playlists/public?page=&size=&sort=&direction=&search=
pub async fn list_public(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(query): Query<PlaylistQuery>,
) -> ApiResult<Page<Playlist>> {
    let sort = PlaylistSort::parse(query.sort.as_deref(), query.direction.as_deref());
    let playlists =
        playlists::list_public(app_state.db.pool(), query.search.as_deref(), sort, page).await?;
    Ok(ApiResponse::ok("Public playlists loaded successfully", playlists))
}

/// GET /api/playlists/mine
pub async fn list_mine(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<Playlist>> {
    let playlists = playlists::list_by_owner(app_state.db.pool(), auth.account_id(), page).await?;
    Ok(ApiResponse::ok("User playlists loaded successfully", playlists))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
) -> ApiResult<Playlist> {
    let playlist = visible_playlist(&app_state.db, id, viewer.as_ref()).await?;
    Ok(ApiResponse::ok("Playlist loaded successfully", playlist))
}

/// GET /api/playlists/:id/music
pub async fn get_playlist_music(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
) -> ApiResult<Vec<PlaylistEntry>> {
    visible_playlist(&app_state.db, id, viewer.as_ref()).await?;
    let entries = playlists::entries(app_state.db.pool(), id).await?;
    Ok(ApiResponse::ok("Playlist music loaded successfully", entries))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> ApiResult<Playlist> {
    if req.name.trim().is_empty() {
        return Err(ServerError::bad_request("Playlist name must not be empty"));
    }

    let playlist = playlists::create(
        app_state.db.pool(),
        NewPlaylist {
            owner_id: auth.account_id(),
            name: req.name,
            description: req.description,
            image_url: req.image_url,
            is_public: req.is_public,
        },
    )
    .await?;
    Ok(ApiResponse::ok("Playlist created successfully", playlist))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylist>,
) -> ApiResult<Playlist> {
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ServerError::bad_request("Playlist name must not be empty"));
    }

    modifiable_playlist(&app_state.db, id, auth.identity()).await?;
    let playlist = playlists::update(app_state.db.pool(), id, req).await?;
    Ok(ApiResponse::ok("Playlist updated successfully", playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    modifiable_playlist(&app_state.db, id, auth.identity()).await?;
    playlists::delete(app_state.db.pool(), id).await?;
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

/// POST /api/playlists/:id/music/:music_id
pub async fn add_music(
    Path((id, music_id)): Path<(PlaylistId, MusicId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<PlaylistEntry> {
    modifiable_playlist(&app_state.db, id, auth.identity()).await?;
    let entry = playlists::add_music(app_state.db.pool(), id, music_id).await?;
    Ok(ApiResponse::ok("Music added to playlist successfully", entry))
}

/// DELETE /api/playlists/:id/music/:music_id
pub async fn remove_music(
    Path((id, music_id)): Path<(PlaylistId, MusicId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<()> {
    modifiable_playlist(&app_state.db, id, auth.identity()).await?;
    playlists::remove_music(app_state.db.pool(), id, music_id).await?;
    Ok(ApiResponse::message("Music removed from playlist successfully"))
}
