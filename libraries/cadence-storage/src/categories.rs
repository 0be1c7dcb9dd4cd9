use crate::error::map_constraint;
use crate::time::{from_unix, now};
use cadence_core::{
    error::Result,
    types::{Category, CategoryId, NewCategory, UpdateCategory},
    CadenceError,
};
use sqlx::{FromRow, SqlitePool};

const COLUMNS: &str = "id, name, description, image_url, is_active, created_at";

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    created_at: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: from_unix(row.created_at),
        }
    }
}

/// Active categories ordered by name
pub async fn get_active(pool: &SqlitePool) -> Result<Vec<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM categories WHERE is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, CategoryRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Every category, including inactive ones
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM categories ORDER BY name");
    let rows = sqlx::query_as::<_, CategoryRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: CategoryId) -> Result<Option<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = ?");
    let row = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Category::from))
}

pub async fn create(pool: &SqlitePool, category: NewCategory) -> Result<Category> {
    let sql = format!(
        "INSERT INTO categories (name, description, image_url, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(category.name.trim())
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(now())
        .fetch_one(pool)
        .await
        .map_err(|e| map_constraint(e, "Category name already exists", "Category not found"))?;
    Ok(row.into())
}

/// Apply the fields present in `update`
pub async fn update(pool: &SqlitePool, id: CategoryId, update: UpdateCategory) -> Result<Category> {
    let sql = format!(
        "UPDATE categories SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            image_url = COALESCE(?, image_url),
            is_active = COALESCE(?, is_active)
         WHERE id = ?
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(update.name.as_deref().map(str::trim))
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(update.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_constraint(e, "Category name already exists", "Category not found"))?
        .ok_or_else(|| CadenceError::not_found(format!("Category not found: {id}")))?;
    Ok(row.into())
}

pub async fn delete(pool: &SqlitePool, id: CategoryId) -> Result<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found(format!("Category not found: {id}")));
    }
    Ok(())
}
