/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use cadence_core::{AccountId, Identity, PasswordHasher, TokenIssuer};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (account ID)
    pub username: String,
    pub is_admin: bool,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl AuthService {
    pub fn new(secret: String, access_expiration_minutes: u64, refresh_expiration_days: u64) -> Self {
        Self {
            secret,
            access_token_expiration: Duration::minutes(access_expiration_minutes as i64),
            refresh_token_expiration: Duration::days(refresh_expiration_days as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor (tests use the minimum, 4)
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create an access token
    pub fn create_access_token(&self, identity: &Identity) -> Result<String> {
        self.create_token(identity, TokenType::Access, self.access_token_expiration)
    }

    /// Create a refresh token
    pub fn create_refresh_token(&self, identity: &Identity) -> Result<String> {
        self.create_token(identity, TokenType::Refresh, self.refresh_token_expiration)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify that a token is an access token and return its subject
    pub fn verify_access_token(&self, token: &str) -> Result<Identity> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(ServerError::unauthorized("Invalid token type"));
        }
        Ok(Identity {
            id: parse_subject(&claims.sub)?,
            username: claims.username,
            is_admin: claims.is_admin,
        })
    }

    /// Verify that a token is a refresh token and return the account it names
    pub fn verify_refresh_token(&self, token: &str) -> Result<AccountId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(ServerError::unauthorized("Invalid token type"));
        }
        parse_subject(&claims.sub)
    }

    fn create_token(
        &self,
        identity: &Identity,
        token_type: TokenType,
        expiration: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + expiration;

        let claims = Claims {
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            is_admin: identity.is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }
}

fn parse_subject(sub: &str) -> Result<AccountId> {
    sub.parse()
        .map_err(|_| ServerError::unauthorized("Invalid token subject"))
}

impl TokenIssuer for AuthService {
    fn issue_access_token(&self, identity: &Identity) -> cadence_core::Result<String> {
        Ok(self.create_access_token(identity)?)
    }

    fn issue_refresh_token(&self, identity: &Identity) -> cadence_core::Result<String> {
        Ok(self.create_refresh_token(identity)?)
    }
}

impl PasswordHasher for AuthService {
    fn hash(&self, plaintext: &str) -> cadence_core::Result<String> {
        Ok(self.hash_password(plaintext)?)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> cadence_core::Result<bool> {
        Ok(self.verify_password(plaintext, hash)?)
    }
}
