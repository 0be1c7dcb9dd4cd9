/// Authentication service tests
/// Tests JWT issuance and password hashing wired through the credential manager
mod common;

use cadence_server::services::auth::{AuthService, Claims, TokenType};
use chrono::Utc;
use common::TestApp;
use jsonwebtoken::{encode, EncodingKey, Header};

fn create_test_auth_service() -> AuthService {
    AuthService::new(common::TEST_SECRET.to_string(), 60, 7).with_bcrypt_cost(4)
}

/// Registered accounts store a bcrypt hash, never the plaintext
#[tokio::test]
async fn test_registration_stores_bcrypt_hash() {
    let app = TestApp::new().await;
    app.register("alice", "SecurePassword123!").await;

    let account = cadence_storage::accounts::find_by_username(app.pool(), "alice")
        .await
        .unwrap()
        .unwrap();

    assert_ne!(account.password_hash, "SecurePassword123!");
    assert!(account.password_hash.starts_with("$2"));
    assert!(app
        .state
        .auth_service
        .verify_password("SecurePassword123!", &account.password_hash)
        .unwrap());
}

/// Session tokens decode back to the account they were issued for
#[tokio::test]
async fn test_session_tokens_carry_identity() {
    let app = TestApp::new().await;
    app.register("bob", "Password123!").await;

    let session = app
        .state
        .credentials
        .login("bob@example.com", "Password123!")
        .await
        .unwrap();

    let identity = app
        .state
        .auth_service
        .verify_access_token(&session.access_token)
        .unwrap();
    assert_eq!(identity.id, session.account.id);
    assert_eq!(identity.username, "bob");
    assert!(!identity.is_admin);

    let account_id = app
        .state
        .auth_service
        .verify_refresh_token(&session.refresh_token)
        .unwrap();
    assert_eq!(account_id, session.account.id);
}

/// Access and refresh tokens cannot stand in for each other
#[tokio::test]
async fn test_token_type_enforced() {
    let app = TestApp::new().await;
    app.register("carol", "Password123!").await;
    let session = app
        .state
        .credentials
        .login("carol", "Password123!")
        .await
        .unwrap();

    let auth = &app.state.auth_service;
    assert!(auth.verify_access_token(&session.refresh_token).is_err());
    assert!(auth.verify_refresh_token(&session.access_token).is_err());
}

/// Refreshed access tokens reflect the account's current role
#[tokio::test]
async fn test_refresh_picks_up_role_change() {
    let app = TestApp::new().await;
    app.register("dave", "Password123!").await;
    let session = app
        .state
        .credentials
        .login("dave", "Password123!")
        .await
        .unwrap();

    cadence_storage::accounts::set_admin(app.pool(), session.account.id, true)
        .await
        .unwrap();

    let access_token = app
        .state
        .credentials
        .refresh(session.account.id)
        .await
        .unwrap();
    let identity = app
        .state
        .auth_service
        .verify_access_token(&access_token)
        .unwrap();
    assert!(identity.is_admin);
}

/// Refresh fails once the account is gone
#[tokio::test]
async fn test_refresh_for_deleted_account() {
    let app = TestApp::new().await;
    app.register("erin", "Password123!").await;
    let account = cadence_storage::accounts::find_by_username(app.pool(), "erin")
        .await
        .unwrap()
        .unwrap();

    cadence_storage::accounts::delete(app.pool(), account.id)
        .await
        .unwrap();

    let result = app.state.credentials.refresh(account.id).await;
    assert!(matches!(
        result,
        Err(cadence_core::CadenceError::Unauthorized(_))
    ));
}

/// Tokens signed with another secret are rejected
#[tokio::test]
async fn test_foreign_signature_rejected() {
    let auth_service = create_test_auth_service();
    let other = AuthService::new("another-secret".to_string(), 60, 7);

    let identity = cadence_core::Identity {
        id: 1,
        username: "mallory".to_string(),
        is_admin: true,
    };
    let forged = other.create_access_token(&identity).unwrap();

    assert!(auth_service.verify_access_token(&forged).is_err());
}

/// Expired tokens are rejected
#[tokio::test]
async fn test_expired_token_rejected() {
    let auth_service = create_test_auth_service();

    let issued = Utc::now().timestamp() - 7200;
    let claims = Claims {
        sub: "1".to_string(),
        username: "alice".to_string(),
        is_admin: false,
        exp: issued + 60,
        iat: issued,
        token_type: TokenType::Access,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

/// Tokens whose subject is not an account ID are rejected
#[tokio::test]
async fn test_non_numeric_subject_rejected() {
    let auth_service = create_test_auth_service();

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "not-a-number".to_string(),
        username: "alice".to_string(),
        is_admin: false,
        exp: now + 600,
        iat: now,
        token_type: TokenType::Access,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

/// Malformed tokens are rejected
#[tokio::test]
async fn test_malformed_tokens() {
    let auth_service = create_test_auth_service();

    for token in ["", "not.a.jwt", "a.b", "invalid"] {
        assert!(
            auth_service.verify_access_token(token).is_err(),
            "token {token:?} should be rejected"
        );
    }
}
