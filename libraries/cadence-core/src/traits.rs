/// Collaborator traits for the credential manager
use crate::error::Result;
use crate::types::{Account, AccountId, Identity, NewAccount};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Account persistence
///
/// Implementations must enforce username/email uniqueness themselves
/// (`insert` returns `CadenceError::Conflict` on violation) and must make the
/// `consume_*` methods atomic: a token may be consumed by at most one caller.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Match `identifier` against username first, then email
    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<Account>>;

    /// Account whose verify token equals `token` and expires after `now`
    async fn find_by_verify_token(&self, token: &str, now: DateTime<Utc>)
        -> Result<Option<Account>>;

    /// Account whose reset token equals `token` and expires after `now`
    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>)
        -> Result<Option<Account>>;

    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    async fn insert(&self, account: NewAccount) -> Result<Account>;

    /// Replace the reset token of account `id`, leaving every other column alone
    async fn issue_reset_token(
        &self,
        id: AccountId,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Account>;

    /// Atomically mark the matching account verified and clear its token
    async fn consume_verify_token(&self, token: &str, now: DateTime<Utc>)
        -> Result<Option<Account>>;

    /// Atomically replace the password of the matching account and clear its token
    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>>;
}

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// `Ok(false)` on mismatch; `Err` only when the hash itself is unusable
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool>;
}

/// Signed session token issuer
///
/// Expiry of each token type is the issuer's configuration.
pub trait TokenIssuer: Send + Sync {
    fn issue_access_token(&self, identity: &Identity) -> Result<String>;

    fn issue_refresh_token(&self, identity: &Identity) -> Result<String>;
}

/// Outbound account notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_verification(&self, email: &str, token: &str) -> Result<()>;

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<()>;
}
