/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
///
/// The first five variants are business outcomes the caller caused and can
/// act on. The remaining variants are system failures.
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Duplicate username, email, or library entry
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or an unusable session
    #[error("{0}")]
    Unauthorized(String),

    /// No entity for the given identifier
    #[error("{0}")]
    NotFound(String),

    /// Invalid input, invalid/expired token, or a load-bearing delivery failure
    #[error("{0}")]
    BadRequest(String),

    /// Authenticated but not allowed (role or ownership)
    #[error("{0}")]
    Forbidden(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Outbound notification failure
    #[error("Notification error: {0}")]
    Notification(String),

    /// Other unexpected failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CadenceError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for failures of the system rather than of the caller's input
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Notification(_) | Self::Internal(_)
        )
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CadenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_not_system_errors() {
        assert!(!CadenceError::conflict("taken").is_system());
        assert!(!CadenceError::unauthorized("bad").is_system());
        assert!(!CadenceError::not_found("gone").is_system());
        assert!(!CadenceError::bad_request("expired").is_system());
        assert!(!CadenceError::forbidden("admin only").is_system());

        assert!(CadenceError::storage("disk full").is_system());
        assert!(CadenceError::notification("smtp down").is_system());
        assert!(CadenceError::internal("boom").is_system());
    }

    #[test]
    fn test_business_messages_are_passed_through() {
        let err = CadenceError::conflict("Username is already taken!");
        assert_eq!(err.to_string(), "Username is already taken!");

        let err = CadenceError::storage("locked");
        assert_eq!(err.to_string(), "Storage error: locked");
    }
}
