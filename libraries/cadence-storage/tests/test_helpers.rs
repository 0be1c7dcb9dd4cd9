//! Test helpers and fixtures for storage integration tests
//!
//! Databases are real SQLite files in a temp dir (not in-memory) so the pool,
//! migrations, constraints and foreign keys behave as in production.

#![allow(dead_code)]

use cadence_core::types::*;
use cadence_storage::Database;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub db: Database,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Database::connect(&db_url)
            .await
            .expect("Failed to open test database");

        Self {
            db,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }
}

/// Test fixture: Create a verified account
pub async fn create_test_account(pool: &SqlitePool, username: &str) -> Account {
    cadence_storage::accounts::create(
        pool,
        NewAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            is_verified: true,
            is_admin: false,
            verify_token: None,
            verify_token_expiry: None,
        },
    )
    .await
    .expect("Failed to create test account")
}

/// Test fixture: Create a category
pub async fn create_test_category(pool: &SqlitePool, name: &str) -> Category {
    cadence_storage::categories::create(
        pool,
        NewCategory {
            name: name.to_string(),
            description: None,
            image_url: None,
        },
    )
    .await
    .expect("Failed to create test category")
}

/// Test fixture: Create an artist
pub async fn create_test_artist(pool: &SqlitePool, name: &str) -> Artist {
    cadence_storage::artists::create(
        pool,
        NewArtist {
            name: name.to_string(),
            bio: None,
            avatar_url: None,
        },
    )
    .await
    .expect("Failed to create test artist")
}

/// Test fixture: Create a song, optionally linked to a category and artist
pub async fn create_test_music(
    pool: &SqlitePool,
    title: &str,
    category_id: Option<CategoryId>,
    artist_id: Option<ArtistId>,
) -> Music {
    cadence_storage::music::create(
        pool,
        NewMusic {
            title: title.to_string(),
            duration_seconds: 180,
            file_url: format!("/uploads/{}.mp3", title.to_lowercase().replace(' ', "-")),
            image_url: None,
            music_type: MusicType::Song,
            category_id,
            artist_id,
        },
    )
    .await
    .expect("Failed to create test music")
}

/// Test fixture: Create a playlist
pub async fn create_test_playlist(
    pool: &SqlitePool,
    name: &str,
    owner_id: AccountId,
    is_public: bool,
) -> Playlist {
    cadence_storage::playlists::create(
        pool,
        NewPlaylist {
            owner_id,
            name: name.to_string(),
            description: None,
            image_url: None,
            is_public,
        },
    )
    .await
    .expect("Failed to create test playlist")
}
