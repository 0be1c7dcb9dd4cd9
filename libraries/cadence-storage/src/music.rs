//! Music catalog queries
//!
//! Every read joins the category and artist so callers get a complete
//! [`Music`] in one round trip. The library slices (playlists, favorites,
//! history, my list) reuse [`MusicRow`] and [`SELECT_MUSIC`] for the same
//! shape.

use crate::error::map_constraint;
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{
        ArtistId, ArtistStats, ArtistSummary, CategorySummary, Music, MusicFilter, MusicId,
        NewMusic, Page, PageRequest, UpdateMusic,
    },
    CadenceError,
};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

/// Music columns plus the joined category and artist names
pub(crate) const SELECT_MUSIC: &str = "m.id, m.title, m.duration_seconds, m.file_url, \
     m.image_url, m.music_type, m.play_count, m.is_active, m.created_at, m.updated_at, \
     c.id AS category_id, c.name AS category_name, a.id AS artist_id, a.name AS artist_name";

/// Joins that go with [`SELECT_MUSIC`]; the music table is aliased `m`
pub(crate) const MUSIC_JOINS: &str = "LEFT JOIN categories c ON c.id = m.category_id \
     LEFT JOIN artists a ON a.id = m.artist_id";

#[derive(FromRow)]
pub(crate) struct MusicRow {
    id: i64,
    title: String,
    duration_seconds: i64,
    file_url: String,
    image_url: Option<String>,
    music_type: String,
    play_count: i64,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    artist_id: Option<i64>,
    artist_name: Option<String>,
}

impl From<MusicRow> for Music {
    fn from(row: MusicRow) -> Self {
        let category = row
            .category_id
            .zip(row.category_name)
            .map(|(id, name)| CategorySummary { id, name });
        let artist = row
            .artist_id
            .zip(row.artist_name)
            .map(|(id, name)| ArtistSummary { id, name });

        Music {
            id: row.id,
            title: row.title,
            duration_seconds: row.duration_seconds,
            file_url: row.file_url,
            image_url: row.image_url,
            // The schema CHECK keeps this in range
            music_type: row.music_type.parse().unwrap_or_default(),
            category,
            artist,
            play_count: row.play_count,
            is_active: row.is_active,
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a MusicFilter, active_only: bool) {
    qb.push(" WHERE 1 = 1");
    if active_only {
        qb.push(" AND m.is_active = 1");
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND (m.title LIKE '%' || ")
            .push_bind(search)
            .push(" || '%' OR a.name LIKE '%' || ")
            .push_bind(search)
            .push(" || '%')");
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND m.category_id = ").push_bind(category_id);
    }
    if let Some(artist_id) = filter.artist_id {
        qb.push(" AND m.artist_id = ").push_bind(artist_id);
    }
}

/// Filtered music, newest first
pub async fn list(
    pool: &SqlitePool,
    filter: &MusicFilter,
    page: PageRequest,
    active_only: bool,
) -> Result<Page<Music>> {
    let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM music m {MUSIC_JOINS}"));
    push_filters(&mut count, filter, active_only);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {SELECT_MUSIC} FROM music m {MUSIC_JOINS}"));
    push_filters(&mut qb, filter, active_only);
    qb.push(" ORDER BY m.created_at DESC, m.id DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<MusicRow>().fetch_all(pool).await?;
    Ok(Page::new(
        rows.into_iter().map(Music::from).collect(),
        page,
        total,
    ))
}

pub async fn get_by_id(pool: &SqlitePool, id: MusicId) -> Result<Option<Music>> {
    let sql = format!("SELECT {SELECT_MUSIC} FROM music m {MUSIC_JOINS} WHERE m.id = ?");
    let row = sqlx::query_as::<_, MusicRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Music::from))
}

/// Most played active music
pub async fn trending(pool: &SqlitePool, limit: i64) -> Result<Vec<Music>> {
    let sql = format!(
        "SELECT {SELECT_MUSIC} FROM music m {MUSIC_JOINS}
         WHERE m.is_active = 1
         ORDER BY m.play_count DESC, m.id DESC
         LIMIT ?"
    );
    let rows = sqlx::query_as::<_, MusicRow>(&sql)
        .bind(limit.clamp(1, 100))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Music::from).collect())
}

/// Bump the play counter of an active music item, returning the new count
pub async fn increment_play_count(pool: &SqlitePool, id: MusicId) -> Result<i64> {
    sqlx::query_scalar(
        "UPDATE music SET play_count = play_count + 1
         WHERE id = ? AND is_active = 1
         RETURNING play_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| CadenceError::not_found(format!("Music not found: {id}")))
}

/// Music count and summed play count for `artist_id`
///
/// An artist without music, or an unknown id, yields zeroes.
pub async fn artist_stats(pool: &SqlitePool, artist_id: ArtistId) -> Result<ArtistStats> {
    let (music_count, total_plays): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(play_count), 0) FROM music WHERE artist_id = ?",
    )
    .bind(artist_id)
    .fetch_one(pool)
    .await?;

    Ok(ArtistStats {
        artist_id,
        music_count,
        total_plays,
    })
}

pub async fn create(pool: &SqlitePool, music: NewMusic) -> Result<Music> {
    let ts = now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO music
            (title, duration_seconds, file_url, image_url, music_type,
             category_id, artist_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(music.title.trim())
    .bind(music.duration_seconds)
    .bind(&music.file_url)
    .bind(&music.image_url)
    .bind(music.music_type.as_str())
    .bind(music.category_id)
    .bind(music.artist_id)
    .bind(ts)
    .bind(ts)
    .fetch_one(pool)
    .await
    .map_err(|e| map_constraint(e, "Music already exists", "Category or artist not found"))?;

    tracing::debug!("Created music {} ({})", id, music.title);

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CadenceError::internal(format!("Music {id} vanished after insert")))
}

/// Apply the fields present in `update`
pub async fn update(pool: &SqlitePool, id: MusicId, update: UpdateMusic) -> Result<Music> {
    let result = sqlx::query(
        "UPDATE music SET
            title = COALESCE(?, title),
            duration_seconds = COALESCE(?, duration_seconds),
            file_url = COALESCE(?, file_url),
            image_url = COALESCE(?, image_url),
            music_type = COALESCE(?, music_type),
            category_id = COALESCE(?, category_id),
            artist_id = COALESCE(?, artist_id),
            is_active = COALESCE(?, is_active),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(update.title.as_deref().map(str::trim))
    .bind(update.duration_seconds)
    .bind(&update.file_url)
    .bind(&update.image_url)
    .bind(update.music_type.map(|t| t.as_str()))
    .bind(update.category_id)
    .bind(update.artist_id)
    .bind(update.is_active)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| map_constraint(e, "Music already exists", "Category or artist not found"))?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found(format!("Music not found: {id}")));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Music not found: {id}")))
}

pub async fn delete(pool: &SqlitePool, id: MusicId) -> Result<()> {
    let result = sqlx::query("DELETE FROM music WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found(format!("Music not found: {id}")));
    }
    Ok(())
}

/// Fail with `NotFound` unless an active music item with `id` exists
pub(crate) async fn ensure_active(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: MusicId,
) -> Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM music WHERE id = ? AND is_active = 1)")
            .bind(id)
            .fetch_one(executor)
            .await?;

    if exists {
        Ok(())
    } else {
        Err(CadenceError::not_found(format!("Music not found: {id}")))
    }
}
