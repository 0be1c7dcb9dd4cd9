/// Shared application state
use crate::services::AuthService;
use cadence_core::CredentialManager;
use cadence_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub credentials: Arc<CredentialManager>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            db,
            auth_service,
            credentials,
        }
    }
}
