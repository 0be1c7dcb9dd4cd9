use cadence_core::{error::Result, types::DashboardStats};
use sqlx::{FromRow, SqlitePool};

#[derive(FromRow)]
struct StatsRow {
    total_users: i64,
    normal_users: i64,
    verified_users: i64,
    total_music: i64,
    active_music: i64,
    total_playlists: i64,
    total_categories: i64,
    total_artists: i64,
}

/// Admin dashboard counters in a single query
pub async fn dashboard(pool: &SqlitePool) -> Result<DashboardStats> {
    let row = sqlx::query_as::<_, StatsRow>(
        "SELECT
            (SELECT COUNT(*) FROM accounts) AS total_users,
            (SELECT COUNT(*) FROM accounts WHERE is_admin = 0) AS normal_users,
            (SELECT COUNT(*) FROM accounts WHERE is_verified = 1) AS verified_users,
            (SELECT COUNT(*) FROM music) AS total_music,
            (SELECT COUNT(*) FROM music WHERE is_active = 1) AS active_music,
            (SELECT COUNT(*) FROM playlists) AS total_playlists,
            (SELECT COUNT(*) FROM categories) AS total_categories,
            (SELECT COUNT(*) FROM artists) AS total_artists",
    )
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_users: row.total_users,
        normal_users: row.normal_users,
        verified_users: row.verified_users,
        total_music: row.total_music,
        active_music: row.active_music,
        total_playlists: row.total_playlists,
        total_categories: row.total_categories,
        total_artists: row.total_artists,
    })
}
