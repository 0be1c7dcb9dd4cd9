//! Cadence Storage
//!
//! `SQLite` persistence for accounts, the music catalog and per-user libraries.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each table owns its own queries (`accounts`, `music`, `playlists`, ...)
//! - **Constraints First**: Uniqueness and references are enforced by the schema;
//!   violations surface as `Conflict` / `NotFound`
//! - **Account Store**: [`Database`] implements `cadence_core::AccountStore` for the
//!   credential manager
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, Database};
//! use cadence_core::AccountStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let db = Database::new(pool);
//! let alice = db.find_by_username("alice").await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod time;

// Vertical slices
pub mod accounts;
pub mod artists;
pub mod categories;
pub mod music;
pub mod playlists;

// Per-user library
pub mod favorites;
pub mod history;
pub mod my_list;

// Admin dashboard
pub mod stats;

pub use context::Database;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");

    Ok(pool)
}
