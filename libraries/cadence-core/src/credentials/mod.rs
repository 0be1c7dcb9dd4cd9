//! Credential and token lifecycle
//!
//! [`CredentialManager`] owns every state transition of an account's
//! authentication material:
//!
//! - **Register**: unique username/email, hashed password, unverified account
//!   with a 24 h verify token, best-effort verification email, auto-login
//! - **Login**: username or email plus password, issues access + refresh tokens
//! - **Verify email**: single-use consumption of the verify token
//! - **Forgot / reset password**: 1 h single-use reset token, email delivery
//!   is required for the request to succeed
//!
//! Storage, hashing, token signing and delivery are injected collaborators.

use crate::error::{CadenceError, Result};
use crate::traits::{AccountStore, Notifier, PasswordHasher, TokenIssuer};
use crate::types::{Account, AccountId, AuthSession, NewAccount};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;


const INVALID_CREDENTIALS: &str = "Invalid username/email or password";

/// Lifetimes of the email-delivered tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub verify_token_ttl: Duration,
    pub reset_token_ttl: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            verify_token_ttl: Duration::hours(24),
            reset_token_ttl: Duration::hours(1),
        }
    }
}

pub struct CredentialManager {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
    notifier: Arc<dyn Notifier>,
    policy: TokenPolicy,
}

impl CredentialManager {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            hasher,
            issuer,
            notifier,
            policy: TokenPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Create an unverified account and log it in.
    ///
    /// Verification email failures are logged, never returned.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthSession> {
        validate_registration(username, email, password)?;
        self.ensure_available(username, email).await?;

        let password_hash = self.hasher.hash(password)?;
        let verify_token = generate_token();
        let account = self
            .store
            .insert(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                is_verified: false,
                is_admin: false,
                verify_token: Some(verify_token.clone()),
                verify_token_expiry: Some(Utc::now() + self.policy.verify_token_ttl),
            })
            .await?;

        tracing::info!(account_id = account.id, username = %account.username, "Account registered");

        if let Err(e) = self
            .notifier
            .send_verification(&account.email, &verify_token)
            .await
        {
            tracing::warn!(account_id = account.id, "Verification email not sent: {}", e);
        }

        self.login(username, password).await
    }

    /// Authenticate by username or email and issue a session.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<AuthSession> {
        let account = self
            .store
            .find_by_username_or_email(username_or_email)
            .await?
            .ok_or_else(|| CadenceError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &account.password_hash)? {
            tracing::debug!(account_id = account.id, "Password mismatch");
            return Err(CadenceError::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue_session(&account)
    }

    /// Consume a verification token.
    pub async fn verify_email(&self, token: &str) -> Result<Account> {
        let account = self
            .store
            .consume_verify_token(token, Utc::now())
            .await?
            .ok_or_else(|| CadenceError::bad_request("Invalid or expired verification token"))?;

        tracing::info!(account_id = account.id, "Email verified");
        Ok(account)
    }

    /// Issue a fresh reset token and email it.
    ///
    /// Any earlier reset token stops validating. Delivery failure fails the
    /// request.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| CadenceError::not_found(format!("User not found with email: {email}")))?;

        let reset_token = generate_token();
        let account = self
            .store
            .issue_reset_token(
                account.id,
                &reset_token,
                Utc::now() + self.policy.reset_token_ttl,
            )
            .await?;

        self.notifier
            .send_password_reset(&account.email, &reset_token)
            .await
            .map_err(|e| {
                tracing::error!(account_id = account.id, "Reset email not sent: {}", e);
                CadenceError::bad_request("Failed to send reset password email")
            })?;

        tracing::info!(account_id = account.id, "Password reset requested");
        Ok(())
    }

    /// Consume a reset token and replace the password.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(CadenceError::bad_request("New password must not be empty"));
        }

        let invalid = || CadenceError::bad_request("Invalid or expired reset token");

        // Reject unknown tokens before paying for a hash
        if self
            .store
            .find_by_reset_token(token, Utc::now())
            .await?
            .is_none()
        {
            return Err(invalid());
        }

        let password_hash = self.hasher.hash(new_password)?;
        let account = self
            .store
            .consume_reset_token(token, &password_hash, Utc::now())
            .await?
            .ok_or_else(invalid)?;

        tracing::info!(account_id = account.id, "Password reset");
        Ok(())
    }

    /// New access token for an account holding a valid refresh token.
    ///
    /// The account is reloaded so the token carries its current role.
    pub async fn refresh(&self, account_id: AccountId) -> Result<String> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| CadenceError::unauthorized("Account no longer exists"))?;

        self.issuer.issue_access_token(&account.identity())
    }

    /// Create a verified account without sending email (operator tooling).
    pub async fn provision(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<Account> {
        validate_registration(username, email, password)?;
        self.ensure_available(username, email).await?;

        let password_hash = self.hasher.hash(password)?;
        let account = self
            .store
            .insert(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                is_verified: true,
                is_admin,
                verify_token: None,
                verify_token_expiry: None,
            })
            .await?;

        tracing::info!(account_id = account.id, is_admin, "Account provisioned");
        Ok(account)
    }

    async fn ensure_available(&self, username: &str, email: &str) -> Result<()> {
        if self.store.exists_by_username(username).await? {
            return Err(CadenceError::conflict("Username is already taken!"));
        }
        if self.store.exists_by_email(email).await? {
            return Err(CadenceError::conflict("Email is already in use!"));
        }
        Ok(())
    }

    fn issue_session(&self, account: &Account) -> Result<AuthSession> {
        let identity = account.identity();
        Ok(AuthSession {
            access_token: self.issuer.issue_access_token(&identity)?,
            refresh_token: self.issuer.issue_refresh_token(&identity)?,
            account: account.summary(),
        })
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(CadenceError::bad_request("Username must not be empty"));
    }
    if !email.contains('@') {
        return Err(CadenceError::bad_request("Email address is invalid"));
    }
    if password.is_empty() {
        return Err(CadenceError::bad_request("Password must not be empty"));
    }
    Ok(())
}

/// Random, unguessable token for email links
fn generate_token() -> String {
    Uuid::new_v4().to_string()
}
