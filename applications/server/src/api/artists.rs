/// Artist API routes
use crate::{
    api::{ApiResponse, ApiResult},
    error::ServerError,
    state::AppState,
};
use axum::extract::{Path, Query, State};
use cadence_core::{Artist, ArtistId, Music, MusicFilter, Page, PageRequest};
use cadence_storage::{artists, music};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// GET /api/artists?page=&size=&search=
pub async fn list_artists(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Page<Artist>> {
    let artists = artists::list(app_state.db.pool(), query.search.as_deref(), true, page).await?;
    Ok(ApiResponse::ok("Artists loaded successfully", artists))
}

/// GET /api/artists/:id
pub async fn get_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
) -> ApiResult<Artist> {
    let artist = artists::get_by_id(app_state.db.pool(), id)
        .await?
        .filter(|a| a.is_active)
        .ok_or_else(|| ServerError::not_found(format!("Artist not found: {id}")))?;
    Ok(ApiResponse::ok("Artist loaded successfully", artist))
}

/// GET /api/artists/:id/music
pub async fn artist_music(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<Music>> {
    let pool = app_state.db.pool();
    if artists::get_by_id(pool, id).await?.is_none() {
        return Err(ServerError::not_found(format!("Artist not found: {id}")));
    }

    let filter = MusicFilter {
        artist_id: Some(id),
        ..Default::default()
    };
    let music = music::list(pool, &filter, page, true).await?;
    Ok(ApiResponse::ok("Artist music loaded successfully", music))
}
