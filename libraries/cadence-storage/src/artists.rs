use crate::error::map_constraint;
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{Artist, ArtistId, NewArtist, Page, PageRequest, UpdateArtist},
    CadenceError,
};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, name, bio, avatar_url, is_active, created_at";

#[derive(FromRow)]
struct ArtistRow {
    id: i64,
    name: String,
    bio: Option<String>,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: i64,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Artist {
            id: row.id,
            name: row.name,
            bio: row.bio,
            avatar_url: row.avatar_url,
            is_active: row.is_active,
            created_at: from_unix(row.created_at),
        }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, search: Option<&'a str>, active_only: bool) {
    qb.push(" WHERE 1 = 1");
    if active_only {
        qb.push(" AND is_active = 1");
    }
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        qb.push(" AND name LIKE '%' || ")
            .push_bind(search)
            .push(" || '%'");
    }
}

/// Artists ordered by name, optionally filtered by a name fragment
pub async fn list(
    pool: &SqlitePool,
    search: Option<&str>,
    active_only: bool,
    page: PageRequest,
) -> Result<Page<Artist>> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM artists");
    push_filters(&mut count, search, active_only);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM artists"));
    push_filters(&mut qb, search, active_only);
    qb.push(" ORDER BY name COLLATE NOCASE LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<ArtistRow>().fetch_all(pool).await?;
    Ok(Page::new(
        rows.into_iter().map(Artist::from).collect(),
        page,
        total,
    ))
}

pub async fn get_by_id(pool: &SqlitePool, id: ArtistId) -> Result<Option<Artist>> {
    let sql = format!("SELECT {COLUMNS} FROM artists WHERE id = ?");
    let row = sqlx::query_as::<_, ArtistRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Artist::from))
}

pub async fn create(pool: &SqlitePool, artist: NewArtist) -> Result<Artist> {
    let sql = format!(
        "INSERT INTO artists (name, bio, avatar_url, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, ArtistRow>(&sql)
        .bind(artist.name.trim())
        .bind(&artist.bio)
        .bind(&artist.avatar_url)
        .bind(now())
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint(e, "Artist name already exists", "Artist not found"))?;
    Ok(row.into())
}

pub async fn update(pool: &SqlitePool, id: ArtistId, update: UpdateArtist) -> Result<Artist> {
    let sql = format!(
        "UPDATE artists SET
            name = COALESCE(?, name),
            bio = COALESCE(?, bio),
            avatar_url = COALESCE(?, avatar_url),
            is_active = COALESCE(?, is_active)
         WHERE id = ?
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, ArtistRow>(&sql)
        .bind(update.name.as_deref().map(str::trim))
        .bind(&update.bio)
        .bind(&update.avatar_url)
        .bind(update.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_constraint(e, "Artist name already exists", "Artist not found"))?
        .ok_or_else(|| CadenceError::not_found(format!("Artist not found: {id}")))?;
    Ok(row.into())
}

pub async fn delete(pool: &SqlitePool, id: ArtistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found(format!("Artist not found: {id}")));
    }
    Ok(())
}
