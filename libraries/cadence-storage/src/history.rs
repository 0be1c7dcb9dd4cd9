//! Listening history ("recently played")
//!
//! Append-only: the same music may appear any number of times.

use crate::music::{self, MusicRow, MUSIC_JOINS, SELECT_MUSIC};
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{AccountId, HistoryEntry, MusicId, Page, PageRequest},
    CadenceError,
};
use sqlx::{FromRow, SqlitePool};

#[derive(FromRow)]
struct HistoryRow {
    entry_id: i64,
    entry_played_at: i64,
    #[sqlx(flatten)]
    music: MusicRow,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: row.entry_id,
            music: row.music.into(),
            played_at: from_unix(row.entry_played_at),
        }
    }
}

/// Plays of `account_id`, most recent first
pub async fn list(
    pool: &SqlitePool,
    account_id: AccountId,
    page: PageRequest,
) -> Result<Page<HistoryEntry>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history WHERE account_id = ?")
        .bind(account_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT h.id AS entry_id, h.played_at AS entry_played_at, {SELECT_MUSIC}
         FROM history h
         JOIN music m ON m.id = h.music_id
         {MUSIC_JOINS}
         WHERE h.account_id = ?
         ORDER BY h.played_at DESC, h.id DESC
         LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, HistoryRow>(&sql)
        .bind(account_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(
        rows.into_iter().map(HistoryEntry::from).collect(),
        page,
        total,
    ))
}

pub async fn record(pool: &SqlitePool, account_id: AccountId, music_id: MusicId) -> Result<HistoryEntry> {
    music::ensure_active(pool, music_id).await?;

    let ts = now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO history (account_id, music_id, played_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(account_id)
    .bind(music_id)
    .bind(ts)
    .fetch_one(pool)
    .await?;

    let music = music::get_by_id(pool, music_id)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Music not found: {music_id}")))?;

    Ok(HistoryEntry {
        id,
        music,
        played_at: from_unix(ts),
    })
}
