//! "My list": a saved-for-later set of music per account

use crate::error::map_constraint;
use crate::music::{self, MusicRow, MUSIC_JOINS, SELECT_MUSIC};
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{AccountId, MusicId, MyListEntry},
    CadenceError,
};
use sqlx::{FromRow, SqlitePool};

#[derive(FromRow)]
struct MyListRow {
    entry_id: i64,
    entry_added_at: i64,
    #[sqlx(flatten)]
    music: MusicRow,
}

impl From<MyListRow> for MyListEntry {
    fn from(row: MyListRow) -> Self {
        MyListEntry {
            id: row.entry_id,
            music: row.music.into(),
            added_at: from_unix(row.entry_added_at),
        }
    }
}

/// Entries of `account_id`, most recently added first
pub async fn list(pool: &SqlitePool, account_id: AccountId) -> Result<Vec<MyListEntry>> {
    let sql = format!(
        "SELECT l.id AS entry_id, l.added_at AS entry_added_at, {SELECT_MUSIC}
         FROM my_list l
         JOIN music m ON m.id = l.music_id
         {MUSIC_JOINS}
         WHERE l.account_id = ?
         ORDER BY l.added_at DESC, l.id DESC"
    );
    let rows = sqlx::query_as::<_, MyListRow>(&sql)
        .bind(account_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(MyListEntry::from).collect())
}

pub async fn add(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<MyListEntry> {
    music::ensure_active(pool, music_id).await?;

    let ts = now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO my_list (account_id, music_id, added_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(account_id)
    .bind(music_id)
    .bind(ts)
    .fetch_one(pool)
    .await
    .map_err(|e| map_constraint(e, "Music is already in your list", "Music not found"))?;

    let music = music::get_by_id(pool, music_id)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Music not found: {music_id}")))?;

    Ok(MyListEntry {
        id,
        music,
        added_at: from_unix(ts),
    })
}

pub async fn remove(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<()> {
    let result = sqlx::query("DELETE FROM my_list WHERE account_id = ? AND music_id = ?")
        .bind(account_id)
        .bind(music_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found("Music is not in your list"));
    }
    Ok(())
}

pub async fn exists(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM my_list WHERE account_id = ? AND music_id = ?)",
    )
    .bind(account_id)
    .bind(music_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
