/// Authentication API routes
use crate::{
    api::{ApiResponse, ApiResult},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use cadence_core::{AccountProfile, AuthSession, CadenceError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordQuery {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: "Bearer".to_string(),
            id: session.account.id,
            username: session.account.username,
            email: session.account.email,
            is_admin: session.account.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let session = app_state
        .credentials
        .login(&req.username_or_email, &req.password)
        .await?;
    Ok(ApiResponse::ok("Login successful", session.into()))
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let session = app_state
        .credentials
        .register(req.username.trim(), req.email.trim(), &req.password)
        .await?;
    Ok(ApiResponse::ok(
        "Registration successful. Please check your email to verify your account.",
        session.into(),
    ))
}

/// POST /api/auth/verify?token=...
pub async fn verify(
    State(app_state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> ApiResult<()> {
    app_state.credentials.verify_email(&query.token).await?;
    Ok(ApiResponse::message(
        "Email verified successfully. You can now access all features.",
    ))
}

/// POST /api/auth/forgot-password?email=...
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Query(query): Query<ForgotPasswordQuery>,
) -> ApiResult<()> {
    app_state
        .credentials
        .forgot_password(query.email.trim())
        .await?;
    Ok(ApiResponse::message(
        "Password reset link has been sent to your email.",
    ))
}

/// POST /api/auth/reset-password?token=...&newPassword=...
pub async fn reset_password(
    State(app_state): State<AppState>,
    Query(query): Query<ResetPasswordQuery>,
) -> ApiResult<()> {
    app_state
        .credentials
        .reset_password(&query.token, &query.new_password)
        .await?;
    Ok(ApiResponse::message(
        "Password reset successfully. You can now login with your new password.",
    ))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<RefreshResponse> {
    let account_id = app_state
        .auth_service
        .verify_refresh_token(&req.refresh_token)?;

    let access_token = app_state.credentials.refresh(account_id).await?;

    Ok(ApiResponse::ok(
        "Token refreshed",
        RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
        },
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards them.
pub async fn logout() -> ApiResult<()> {
    Ok(ApiResponse::message("Logout successful"))
}

/// GET /api/auth/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> ApiResult<AccountProfile> {
    let account = cadence_storage::accounts::get_by_id(app_state.db.pool(), auth.account_id())
        .await?
        .ok_or_else(|| CadenceError::unauthorized("Account no longer exists"))?;
    Ok(ApiResponse::ok("Profile loaded", account.profile()))
}
