/// Account domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identifier
pub type AccountId = i64;

/// A registered user, including credential and token state.
///
/// This type is never serialized to clients; use [`AccountProfile`] or
/// [`AccountSummary`] for responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verify_token: Option<String>,
    pub verify_token_expiry: Option<DateTime<Utc>>,
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether `token` is this account's verify token and has not expired
    pub fn has_valid_verify_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        token_matches(
            self.verify_token.as_deref(),
            self.verify_token_expiry,
            token,
            now,
        )
    }

    /// Whether `token` is this account's reset token and has not expired
    pub fn has_valid_reset_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        token_matches(
            self.reset_token.as_deref(),
            self.reset_token_expiry,
            token,
            now,
        )
    }

    /// Flip to verified and drop the verify token
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verify_token = None;
        self.verify_token_expiry = None;
    }

    /// Replace any existing reset token
    pub fn issue_reset_token(&mut self, token: String, expiry: DateTime<Utc>) {
        self.reset_token = Some(token);
        self.reset_token_expiry = Some(expiry);
    }

    /// Store a new password hash and drop the reset token
    pub fn apply_password_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_token = None;
        self.reset_token_expiry = None;
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_verified: self.is_verified,
            is_admin: self.is_admin,
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// Both the value and a strictly-future expiry must be present.
fn token_matches(
    stored: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    candidate: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored, expiry) {
        (Some(stored), Some(expiry)) => stored == candidate && expiry > now,
        _ => false,
    }
}

/// Fields for inserting a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub verify_token: Option<String>,
    pub verify_token_expiry: Option<DateTime<Utc>>,
}

/// The subject of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: AccountId,
    pub username: String,
    pub is_admin: bool,
}

/// Account fields returned alongside session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a successful login or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "hash".to_string(),
            is_verified: false,
            verify_token: None,
            verify_token_expiry: None,
            reset_token: None,
            reset_token_expiry: None,
            is_admin: false,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_requires_value_and_future_expiry() {
        let now = Utc::now();
        let mut acc = account();

        assert!(!acc.has_valid_verify_token("abc", now));

        acc.verify_token = Some("abc".to_string());
        assert!(!acc.has_valid_verify_token("abc", now), "no expiry");

        acc.verify_token_expiry = Some(now + Duration::hours(1));
        assert!(acc.has_valid_verify_token("abc", now));
        assert!(!acc.has_valid_verify_token("abd", now));

        acc.verify_token_expiry = Some(now);
        assert!(!acc.has_valid_verify_token("abc", now), "expiry == now");
    }

    #[test]
    fn test_mark_verified_clears_token() {
        let now = Utc::now();
        let mut acc = account();
        acc.verify_token = Some("abc".to_string());
        acc.verify_token_expiry = Some(now + Duration::hours(24));

        acc.mark_verified();

        assert!(acc.is_verified);
        assert!(acc.verify_token.is_none());
        assert!(acc.verify_token_expiry.is_none());
        assert!(!acc.has_valid_verify_token("abc", now));
    }

    #[test]
    fn test_reset_token_overwrite_and_clear() {
        let now = Utc::now();
        let mut acc = account();

        acc.issue_reset_token("t1".to_string(), now + Duration::hours(1));
        acc.issue_reset_token("t2".to_string(), now + Duration::hours(1));
        assert!(!acc.has_valid_reset_token("t1", now));
        assert!(acc.has_valid_reset_token("t2", now));

        acc.apply_password_reset("new-hash".to_string());
        assert_eq!(acc.password_hash, "new-hash");
        assert!(!acc.has_valid_reset_token("t2", now));
    }
}
