//! Account queries
//!
//! Token consumption is a single conditional `UPDATE ... RETURNING`, so the
//! match-and-clear cannot interleave with another request.

use crate::error::map_constraint;
use crate::time::{from_unix, now, to_unix};
use cadence_core::{
    error::Result,
    types::{Account, AccountId, AccountProfile, NewAccount, Page, PageRequest},
    CadenceError,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

const COLUMNS: &str = "id, username, email, password_hash, is_verified, verify_token, \
     verify_token_expiry, reset_token, reset_token_expiry, is_admin, avatar_url, created_at, updated_at";

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    is_verified: bool,
    verify_token: Option<String>,
    verify_token_expiry: Option<i64>,
    reset_token: Option<String>,
    reset_token_expiry: Option<i64>,
    is_admin: bool,
    avatar_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_verified: row.is_verified,
            verify_token: row.verify_token,
            verify_token_expiry: row.verify_token_expiry.map(from_unix),
            reset_token: row.reset_token,
            reset_token_expiry: row.reset_token_expiry.map(from_unix),
            is_admin: row.is_admin,
            avatar_url: row.avatar_url,
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

async fn fetch_one_where(pool: &SqlitePool, clause: &str, value: &str) -> Result<Option<Account>> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE {clause}");
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(value)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn get_by_id(pool: &SqlitePool, id: AccountId) -> Result<Option<Account>> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE id = ?");
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Account>> {
    fetch_one_where(pool, "username = ?", username).await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>> {
    fetch_one_where(pool, "email = ?", email).await
}

/// Username match wins over an email match
pub async fn find_by_username_or_email(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<Account>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM accounts
         WHERE username = ? OR email = ?
         ORDER BY CASE WHEN username = ? THEN 0 ELSE 1 END
         LIMIT 1"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(identifier)
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn find_by_verify_token(
    pool: &SqlitePool,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Account>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM accounts WHERE verify_token = ? AND verify_token_expiry > ?"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(token)
        .bind(to_unix(now))
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn find_by_reset_token(
    pool: &SqlitePool,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Account>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM accounts WHERE reset_token = ? AND reset_token_expiry > ?"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(token)
        .bind(to_unix(now))
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn exists_by_username(pool: &SqlitePool, username: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ?)")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn exists_by_email(pool: &SqlitePool, email: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Insert a new account; the unique constraints are the real uniqueness check
pub async fn create(pool: &SqlitePool, account: NewAccount) -> Result<Account> {
    let ts = now();
    let sql = format!(
        "INSERT INTO accounts
            (username, email, password_hash, is_verified, is_admin,
             verify_token, verify_token_expiry, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.is_verified)
        .bind(account.is_admin)
        .bind(&account.verify_token)
        .bind(account.verify_token_expiry.map(to_unix))
        .bind(ts)
        .bind(ts)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let email_taken = matches!(
                &e,
                sqlx::Error::Database(db) if db.message().contains("accounts.email")
            );
            let message = if email_taken {
                "Email is already in use!"
            } else {
                "Username is already taken!"
            };
            map_constraint(e, message, "Account not found")
        })?;
    Ok(row.into())
}

/// Set a fresh reset token, replacing any earlier one
///
/// Only the reset columns are written, so a verification or password reset
/// committed since the caller's last read is left intact.
pub async fn issue_reset_token(
    pool: &SqlitePool,
    id: AccountId,
    token: &str,
    expiry: DateTime<Utc>,
) -> Result<Account> {
    let sql = format!(
        "UPDATE accounts SET reset_token = ?, reset_token_expiry = ?, updated_at = ?
         WHERE id = ?
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(token)
        .bind(to_unix(expiry))
        .bind(now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Account not found: {id}")))?;
    Ok(row.into())
}

pub async fn consume_verify_token(
    pool: &SqlitePool,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Account>> {
    let sql = format!(
        "UPDATE accounts SET
            is_verified = 1, verify_token = NULL, verify_token_expiry = NULL, updated_at = ?
         WHERE verify_token = ? AND verify_token_expiry > ?
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(to_unix(now))
        .bind(token)
        .bind(to_unix(now))
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

pub async fn consume_reset_token(
    pool: &SqlitePool,
    token: &str,
    password_hash: &str,
    now: DateTime<Utc>,
) -> Result<Option<Account>> {
    let sql = format!(
        "UPDATE accounts SET
            password_hash = ?, reset_token = NULL, reset_token_expiry = NULL, updated_at = ?
         WHERE reset_token = ? AND reset_token_expiry > ?
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(password_hash)
        .bind(to_unix(now))
        .bind(token)
        .bind(to_unix(now))
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Account::from))
}

/// All accounts, oldest first
pub async fn list(pool: &SqlitePool, page: PageRequest) -> Result<Page<AccountProfile>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;

    let sql = format!("SELECT {COLUMNS} FROM accounts ORDER BY id LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let content = rows
        .into_iter()
        .map(|row| Account::from(row).profile())
        .collect();
    Ok(Page::new(content, page, total))
}

pub async fn set_admin(pool: &SqlitePool, id: AccountId, is_admin: bool) -> Result<Account> {
    let sql = format!(
        "UPDATE accounts SET is_admin = ?, updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(is_admin)
        .bind(now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CadenceError::not_found(format!("Account not found: {id}")))?;
    Ok(row.into())
}

pub async fn delete(pool: &SqlitePool, id: AccountId) -> Result<()> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::not_found(format!("Account not found: {id}")));
    }
    Ok(())
}
