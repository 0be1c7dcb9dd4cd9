//! Playlist queries
//!
//! Positions are 0-based and contiguous: appends take `MAX(position) + 1`
//! and removals shift every later entry down by one, both inside a
//! transaction.

use crate::error::map_constraint;
use crate::music::{self, MusicRow, MUSIC_JOINS, SELECT_MUSIC};
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{
        AccountId, MusicId, NewPlaylist, Page, PageRequest, Playlist, PlaylistEntry, PlaylistId,
        PlaylistSort, UpdatePlaylist,
    },
    CadenceError,
};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const SELECT_PLAYLIST: &str = "SELECT p.id, p.owner_id, u.username AS owner_username, p.name, \
     p.description, p.image_url, p.is_public, p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM playlist_music pm WHERE pm.playlist_id = p.id) AS music_count \
     FROM playlists p JOIN accounts u ON u.id = p.owner_id";

#[derive(FromRow)]
struct PlaylistRow {
    id: i64,
    owner_id: i64,
    owner_username: String,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_public: bool,
    music_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Playlist {
            id: row.id,
            owner_id: row.owner_id,
            owner_username: row.owner_username,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_public: row.is_public,
            music_count: row.music_count,
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

#[derive(FromRow)]
struct EntryRow {
    position: i64,
    added_at: i64,
    #[sqlx(flatten)]
    music: MusicRow,
}

fn not_found(id: PlaylistId) -> CadenceError {
    CadenceError::not_found(format!("Playlist not found: {id}"))
}

fn push_filters<'a>(
    qb: &mut QueryBuilder<'a, Sqlite>,
    search: Option<&'a str>,
    public_only: bool,
) {
    qb.push(" WHERE 1 = 1");
    if public_only {
        qb.push(" AND p.is_public = 1");
    }
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND p.name LIKE '%' || ")
            .push_bind(search)
            .push(" || '%'");
    }
}

async fn list_matching(
    pool: &SqlitePool,
    search: Option<&str>,
    public_only: bool,
    sort: PlaylistSort,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM playlists p");
    push_filters(&mut count, search, public_only);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_PLAYLIST);
    push_filters(&mut qb, search, public_only);
    qb.push(" ORDER BY ")
        .push(sort.order_by())
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<PlaylistRow>().fetch_all(pool).await?;
    Ok(Page::new(
        rows.into_iter().map(Playlist::from).collect(),
        page,
        total,
    ))
}

/// Public playlists, optionally filtered by a name fragment
pub async fn list_public(
    pool: &SqlitePool,
    search: Option<&str>,
    sort: PlaylistSort,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    list_matching(pool, search, true, sort, page).await
}

/// Every playlist of every owner, private ones included, most recently updated first
pub async fn list_all(
    pool: &SqlitePool,
    search: Option<&str>,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    list_matching(pool, search, false, PlaylistSort::default(), page).await
}

/// Every playlist owned by `owner_id`, public or not
pub async fn list_by_owner(
    pool: &SqlitePool,
    owner_id: AccountId,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE owner_id = ?")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{SELECT_PLAYLIST} WHERE p.owner_id = ? ORDER BY {} LIMIT ? OFFSET ?",
        PlaylistSort::default().order_by()
    );
    let rows = sqlx::query_as::<_, PlaylistRow>(&sql)
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(
        rows.into_iter().map(Playlist::from).collect(),
        page,
        total,
    ))
}

pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let sql = format!("{SELECT_PLAYLIST} WHERE p.id = ?");
    let row = sqlx::query_as::<_, PlaylistRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Playlist::from))
}

/// Entries of a playlist in position order
pub async fn entries(pool: &SqlitePool, id: PlaylistId) -> Result<Vec<PlaylistEntry>> {
    let sql = format!(
        "SELECT pm.position, pm.added_at, {SELECT_MUSIC}
         FROM playlist_music pm
         JOIN music m ON m.id = pm.music_id
         {MUSIC_JOINS}
         WHERE pm.playlist_id = ?
         ORDER BY pm.position"
    );
    let rows = sqlx::query_as::<_, EntryRow>(&sql)
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistEntry {
            position: row.position,
            added_at: from_unix(row.added_at),
            music: row.music.into(),
        })
        .collect())
}

pub async fn create(pool: &SqlitePool, playlist: NewPlaylist) -> Result<Playlist> {
    let ts = now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO playlists (owner_id, name, description, image_url, is_public, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(playlist.owner_id)
    .bind(playlist.name.trim())
    .bind(&playlist.description)
    .bind(&playlist.image_url)
    .bind(playlist.is_public)
    .bind(ts)
    .bind(ts)
    .fetch_one(pool)
    .await
    .map_err(|e| map_constraint(e, "Playlist already exists", "Account not found"))?;

    tracing::debug!("Created playlist {} for account {}", id, playlist.owner_id);

    get_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Apply the fields present in `update`
pub async fn update(pool: &SqlitePool, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
    let result = sqlx::query(
        "UPDATE playlists SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            image_url = COALESCE(?, image_url),
            is_public = COALESCE(?, is_public),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(update.name.as_deref().map(str::trim))
    .bind(&update.description)
    .bind(&update.image_url)
    .bind(update.is_public)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Append `music_id` to the end of the playlist
///
/// `Conflict` if it is already present, `NotFound` if either side is missing.
pub async fn add_music(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    music_id: MusicId,
) -> Result<PlaylistEntry> {
    let mut tx = pool.begin().await?;
    let ts = now();

    let touched = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(ts)
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;
    if touched.rows_affected() == 0 {
        return Err(not_found(playlist_id));
    }

    music::ensure_active(&mut *tx, music_id).await?;

    let position: i64 = sqlx::query_scalar(
        "INSERT INTO playlist_music (playlist_id, music_id, position, added_at)
         VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_music WHERE playlist_id = ?), ?)
         RETURNING position",
    )
    .bind(playlist_id)
    .bind(music_id)
    .bind(playlist_id)
    .bind(ts)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_constraint(e, "Music already exists in playlist", "Music not found"))?;

    tx.commit().await?;

    tracing::debug!(
        "Added music {} to playlist {} at position {}",
        music_id,
        playlist_id,
        position
    );

    let music = music::get_by_id(pool, music_id)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Music not found: {music_id}")))?;

    Ok(PlaylistEntry {
        position,
        added_at: from_unix(ts),
        music,
    })
}

/// Remove `music_id` and close the gap it leaves
pub async fn remove_music(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    music_id: MusicId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let removed: Option<i64> = sqlx::query_scalar(
        "DELETE FROM playlist_music WHERE playlist_id = ? AND music_id = ? RETURNING position",
    )
    .bind(playlist_id)
    .bind(music_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(position) = removed else {
        return Err(CadenceError::not_found(format!(
            "Music {music_id} is not in playlist {playlist_id}"
        )));
    };

    sqlx::query(
        "UPDATE playlist_music SET position = position - 1 WHERE playlist_id = ? AND position > ?",
    )
    .bind(playlist_id)
    .bind(position)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(now())
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
