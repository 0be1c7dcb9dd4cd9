//! Cadence Server Library
//!
//! HTTP backend for the Cadence music-streaming service: authentication,
//! catalog browsing, playlists, per-user libraries and administration.
//!
//! This library exposes the router and state builders so integration tests
//! can drive the full stack without binding a socket.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, mailer::SmtpNotifier};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use cadence_core::{CredentialManager, Notifier, TokenPolicy};
use cadence_storage::Database;
use chrono::Duration;
use services::{EmailTemplates, LogNotifier};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Token lifetimes from configuration
pub fn token_policy(config: &ServerConfig) -> TokenPolicy {
    TokenPolicy {
        verify_token_ttl: Duration::hours(config.auth.verify_token_hours as i64),
        reset_token_ttl: Duration::minutes(config.auth.reset_token_minutes as i64),
    }
}

/// Auth service configured from `config`
pub fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.access_token_minutes,
        config.auth.refresh_token_days,
    )
    .with_bcrypt_cost(config.auth.bcrypt_cost)
}

/// SMTP notifier when mail is enabled, log-only otherwise
pub fn notifier(config: &ServerConfig) -> Result<Arc<dyn Notifier>> {
    let templates = EmailTemplates::new(&config.mail.app_name, &config.mail.frontend_url)
        .with_policy(token_policy(config));

    if config.mail.enabled {
        tracing::info!("Mail enabled via {}:{}", config.mail.smtp_host, config.mail.smtp_port);
        Ok(Arc::new(SmtpNotifier::new(&config.mail, templates)?))
    } else {
        tracing::warn!("Mail disabled; verification and reset links will only be logged");
        Ok(Arc::new(LogNotifier::new(templates)))
    }
}

/// Wire storage, auth and notification into the shared state
pub fn build_state(
    config: &ServerConfig,
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
) -> AppState {
    let auth_service = Arc::new(auth_service(config));

    let credentials = CredentialManager::new(
        db.clone(),
        auth_service.clone(),
        auth_service.clone(),
        notifier,
    )
    .with_policy(token_policy(config));

    AppState::new(db, auth_service, Arc::new(credentials))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build the full `/api` router
pub fn create_router(app_state: AppState, cors_origins: &[String]) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        // Auth
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/verify", post(api::auth::verify))
        .route("/auth/forgot-password", post(api::auth::forgot_password))
        .route("/auth/reset-password", post(api::auth::reset_password))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/auth/logout", post(api::auth::logout))
        // Catalog
        .route("/categories", get(api::categories::list_categories))
        .route("/categories/:id", get(api::categories::get_category))
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/:id", get(api::artists::get_artist))
        .route("/artists/:id/music", get(api::artists::artist_music))
        .route("/music", get(api::music::list_music))
        .route("/music/trending", get(api::music::trending))
        .route("/music/:id", get(api::music::get_music))
        .route("/music/:id/play", post(api::music::record_play))
        // Playlists (private ones resolve the caller from an optional token)
        .route("/playlists/public", get(api::playlists::list_public))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id/music", get(api::playlists::get_playlist_music));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(api::auth::me))
        // Playlists
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/mine", get(api::playlists::list_mine))
        .route("/playlists/:id", put(api::playlists::update_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/music/:music_id",
            post(api::playlists::add_music),
        )
        .route(
            "/playlists/:id/music/:music_id",
            delete(api::playlists::remove_music),
        )
        // User library
        .route("/user/favorites", get(api::user::list_favorites))
        .route("/user/favorites", post(api::user::add_favorite))
        .route("/user/favorites/:music_id", delete(api::user::remove_favorite))
        .route(
            "/user/favorites/check/:music_id",
            get(api::user::check_favorite),
        )
        .route("/user/recently-played", get(api::user::recently_played))
        .route("/user/recently-played", post(api::user::add_recently_played))
        .route("/user/my-list", get(api::user::my_list))
        .route("/user/my-list", post(api::user::add_to_my_list))
        .route("/user/my-list/:music_id", delete(api::user::remove_from_my_list))
        .route("/user/my-list/check/:music_id", get(api::user::check_my_list))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Admin routes (auth + admin role required)
    let admin_routes = Router::new()
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users/:id", get(api::admin::get_user))
        .route("/admin/users/:id", delete(api::admin::delete_user))
        .route("/admin/users/:id/admin", put(api::admin::set_admin))
        .route("/admin/categories", get(api::admin::list_categories))
        .route("/admin/categories", post(api::admin::create_category))
        .route("/admin/categories/:id", put(api::admin::update_category))
        .route("/admin/categories/:id", delete(api::admin::delete_category))
        .route("/admin/artists", get(api::admin::list_artists))
        .route("/admin/artists", post(api::admin::create_artist))
        .route("/admin/artists/:id", get(api::admin::get_artist))
        .route("/admin/artists/:id", put(api::admin::update_artist))
        .route("/admin/artists/:id", delete(api::admin::delete_artist))
        .route("/admin/artists/:id/stats", get(api::admin::artist_stats))
        .route("/admin/music", get(api::admin::list_music))
        .route("/admin/music", post(api::admin::create_music))
        .route("/admin/music/:id", put(api::admin::update_music))
        .route("/admin/music/:id", delete(api::admin::delete_music))
        .route("/admin/playlists", get(api::admin::list_playlists))
        .route("/admin/playlists/:id", delete(api::admin::delete_playlist))
        .route("/admin/stats", get(api::admin::dashboard_stats))
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(protected_routes).merge(admin_routes),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(cors_layer(cors_origins))
        .with_state(app_state)
}
