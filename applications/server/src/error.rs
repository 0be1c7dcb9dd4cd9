/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_core::CadenceError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Domain outcome, mapped to a status by kind
    #[error(transparent)]
    Domain(#[from] CadenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Domain(CadenceError::unauthorized(msg))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Domain(CadenceError::forbidden(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(CadenceError::not_found(msg))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::Domain(CadenceError::bad_request(msg))
    }

    /// HTTP status and client-facing message
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::Domain(err) => match err {
                CadenceError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CadenceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CadenceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CadenceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CadenceError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CadenceError::Storage(_) | CadenceError::Notification(_) | CadenceError::Internal(_) => {
                    tracing::error!("Internal error: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ServerError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string())
            }
            ServerError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        }
    }
}

// The core traits speak `CadenceError`; collapse server-side failures into it
impl From<ServerError> for CadenceError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Domain(e) => e,
            other => CadenceError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
