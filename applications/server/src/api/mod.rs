/// API route modules
use axum::Json;
use serde::Serialize;

pub mod admin;
pub mod artists;
pub mod auth;
pub mod categories;
pub mod health;
pub mod music;
pub mod playlists;
pub mod user;

/// Success envelope shared by every JSON endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    /// Envelope without a `data` field
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

/// Handler result carrying the success envelope
pub type ApiResult<T> = crate::error::Result<Json<ApiResponse<T>>>;
