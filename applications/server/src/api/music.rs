/// Music catalog API routes
use crate::{
    api::{ApiResponse, ApiResult},
    error::ServerError,
    state::AppState,
};
use axum::extract::{Path, Query, State};
use cadence_core::{Music, MusicFilter, MusicId, Page, PageRequest};
use cadence_storage::music;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default = "default_trending_limit")]
    pub limit: i64,
}

fn default_trending_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCount {
    pub music_id: MusicId,
    pub play_count: i64,
}

/// GET /api/music?page=&size=&search=&categoryId=&artistId=
pub async fn list_music(
    State(app_state): State<AppState>,
    Query(page): Query<PageRequest>,
    Query(filter): Query<MusicFilter>,
) -> ApiResult<Page<Music>> {
    let music = music::list(app_state.db.pool(), &filter, page, true).await?;
    Ok(ApiResponse::ok("Music loaded successfully", music))
}

/// GET /api/music/trending?limit=
pub async fn trending(
    State(app_state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Vec<Music>> {
    let music = music::trending(app_state.db.pool(), query.limit).await?;
    Ok(ApiResponse::ok("Trending music loaded successfully", music))
}

/// GET /api/music/:id
pub async fn get_music(
    Path(id): Path<MusicId>,
    State(app_state): State<AppState>,
) -> ApiResult<Music> {
    let music = music::get_by_id(app_state.db.pool(), id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| ServerError::not_found(format!("Music not found: {id}")))?;
    Ok(ApiResponse::ok("Music loaded successfully", music))
}

/// POST /api/music/:id/play
pub async fn record_play(
    Path(id): Path<MusicId>,
    State(app_state): State<AppState>,
) -> ApiResult<PlayCount> {
    let play_count = music::increment_play_count(app_state.db.pool(), id).await?;
    Ok(ApiResponse::ok(
        "Play recorded",
        PlayCount {
            music_id: id,
            play_count,
        },
    ))
}
