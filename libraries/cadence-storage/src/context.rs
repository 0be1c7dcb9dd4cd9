use crate::accounts;
use async_trait::async_trait;
use cadence_core::{
    error::Result,
    traits::AccountStore,
    types::{Account, AccountId, NewAccount},
    CadenceError,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// `SQLite`-backed storage handle shared by the server
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) and migrate the database at `database_url`
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool)
            .await
            .map_err(|e| CadenceError::storage(format!("Migration failed: {e}")))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to confirm the database answers
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for Database {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        accounts::get_by_id(&self.pool, id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        accounts::find_by_username(&self.pool, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        accounts::find_by_email(&self.pool, email).await
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<Account>> {
        accounts::find_by_username_or_email(&self.pool, identifier).await
    }

    async fn find_by_verify_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        accounts::find_by_verify_token(&self.pool, token, now).await
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        accounts::find_by_reset_token(&self.pool, token, now).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        accounts::exists_by_username(&self.pool, username).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        accounts::exists_by_email(&self.pool, email).await
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        accounts::create(&self.pool, account).await
    }

    async fn issue_reset_token(
        &self,
        id: AccountId,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Account> {
        accounts::issue_reset_token(&self.pool, id, token, expiry).await
    }

    async fn consume_verify_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        accounts::consume_verify_token(&self.pool, token, now).await
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        accounts::consume_reset_token(&self.pool, token, password_hash, now).await
    }
}
