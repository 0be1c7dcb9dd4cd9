/// Authentication middleware
use crate::{error::ServerError, services::AuthService, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use cadence_core::{AccountId, Identity};
use std::sync::Arc;

/// Extension type to store the authenticated identity in the request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn account_id(&self) -> AccountId {
        self.0.id
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Identity of the caller when a valid bearer token is present
///
/// For public routes whose response depends on who is asking. A present
/// but invalid token is rejected rather than treated as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Middleware that extracts and validates JWT from Authorization header
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ServerError::unauthorized("Authentication required"))?;

    let identity = auth_service.verify_access_token(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ServerError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(request).await)
}

/// Middleware that admits only admin identities; must run after [`auth_middleware`]
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ServerError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ServerError::unauthorized("Authentication required"))?;

    if !user.0.is_admin {
        tracing::warn!(account_id = user.0.id, "Admin route denied");
        return Err(ServerError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::unauthorized("Not authenticated"))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(MaybeUser(Some(user.0.clone())));
        }

        match bearer_token(&parts.headers) {
            None => Ok(MaybeUser(None)),
            Some(token) => {
                let identity = state
                    .auth_service
                    .verify_access_token(token)
                    .map_err(|_| ServerError::unauthorized("Invalid or expired token"))?;
                Ok(MaybeUser(Some(identity)))
            }
        }
    }
}
