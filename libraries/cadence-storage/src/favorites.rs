use crate::error::map_constraint;
use crate::music::{self, MusicRow, MUSIC_JOINS, SELECT_MUSIC};
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{AccountId, Favorite, MusicId, Page, PageRequest},
    CadenceError,
};
use sqlx::{FromRow, SqlitePool};

#[derive(FromRow)]
struct FavoriteRow {
    entry_id: i64,
    entry_created_at: i64,
    #[sqlx(flatten)]
    music: MusicRow,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.entry_id,
            music: row.music.into(),
            created_at: from_unix(row.entry_created_at),
        }
    }
}

/// Favorites of `account_id`, newest first
pub async fn list(pool: &SqlitePool, account_id: AccountId, page: PageRequest) -> Result<Page<Favorite>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE account_id = ?")
        .bind(account_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT f.id AS entry_id, f.created_at AS entry_created_at, {SELECT_MUSIC}
         FROM favorites f
         JOIN music m ON m.id = f.music_id
         {MUSIC_JOINS}
         WHERE f.account_id = ?
         ORDER BY f.created_at DESC, f.id DESC
         LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, FavoriteRow>(&sql)
        .bind(account_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(
        rows.into_iter().map(Favorite::from).collect(),
        page,
        total,
    ))
}

pub async fn add(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<Favorite> {
    music::ensure_active(pool, music_id).await?;

    let ts = now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO favorites (account_id, music_id, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(account_id)
    .bind(music_id)
    .bind(ts)
    .fetch_one(pool)
    .await
    .map_err(|e| map_constraint(e, "Music is already in favorites", "Music not found"))?;

    let music = music::get_by_id(pool, music_id)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Music not found: {music_id}")))?;

    Ok(Favorite {
        id,
        music,
        created_at: from_unix(ts),
    })
}

pub async fn remove(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<()> {
    let result = sqlx::query("DELETE FROM favorites WHERE account_id = ? AND music_id = ?")
        .bind(account_id)
        .bind(music_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Music is not in favorites"));
    }
    Ok(())
}

pub async fn exists(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE account_id = ? AND music_id = ?)",
    )
    .bind(account_id)
    .bind(music_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
