// Authentication HTTP routes.
// Decision: /v1/auth/* prefix, consistent with the resource routes
// Decision: login takes a urlencoded form, tokens come back as JSON

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Form, Json, Router,
};
use roster_storage::Database;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::authenticator::{Authenticator, Credential, HttpFederatedVerifier};
use super::config::{AuthConfig, AuthMode};
use super::guard::{AuthError, AuthUser};
use super::tokens::TokenService;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub tokens: Arc<TokenService>,
    pub authenticator: Arc<Authenticator>,
}

impl AuthState {
    pub fn new(config: AuthConfig, db: Arc<Database>) -> Result<Self> {
        let tokens = Arc::new(TokenService::new(&config));
        let authenticator = match config.mode {
            AuthMode::Local => Authenticator::local(db),
            AuthMode::Federated => {
                let federated = config
                    .federated
                    .clone()
                    .context("federated mode requires verifier configuration")?;
                let verifier =
                    HttpFederatedVerifier::new(federated.verify_url, federated.timeout)?;
                Authenticator::federated(db, Arc::new(verifier))
            }
        };

        Ok(Self {
            config,
            tokens,
            authenticator: Arc::new(authenticator),
        })
    }
}

/// Login form. Field names follow the password-grant convention, so
/// `username` carries the account email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// User info response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub badge_number: String,
    pub roles: Vec<String>,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/me", get(me))
        .with_state(state)
}

/// POST /v1/auth/login - Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    Form(req): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let user = state
        .authenticator
        .authenticate(Credential::Password {
            email: req.username,
            password: req.password,
        })
        .await
        .map_err(|e| {
            tracing::error!("Authentication error: {}", e);
            AuthError::unauthorized("Login failed")
        })?
        .ok_or_else(|| AuthError::unauthorized("Incorrect username or password"))?;

    let access_token = state.tokens.issue_default(&user.email).map_err(|e| {
        tracing::error!("Token issuance error: {}", e);
        AuthError::unauthorized("Login failed")
    })?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.default_lifetime().as_secs(),
    }))
}

/// GET /v1/auth/me - Identity behind the presented token
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserInfoResponse),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn me(user: AuthUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        badge_number: user.badge_number,
        roles: user.roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use jsonwebtoken::Algorithm;
    use roster_storage::{password, CreateUser};
    use tower::ServiceExt;

    use crate::auth::authenticator::FederatedVerifier;
    use crate::auth::config::FederatedConfig;

    fn test_config() -> AuthConfig {
        AuthConfig {
            mode: AuthMode::Local,
            jwt_secret: "test-secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::from_secs(900),
            federated: None,
        }
    }

    async fn seeded_db() -> Arc<Database> {
        let db = Arc::new(Database::in_memory());
        db.create_user(CreateUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            badge_number: "E-1".to_string(),
            password_hash: password::hash_password("hunter2").unwrap(),
            role_ids: vec![],
        })
        .await
        .unwrap();
        db
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/auth/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap()
    }

    fn me_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/v1/auth/me");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn login_then_me_roundtrip() {
        let state = AuthState::new(test_config(), seeded_db().await).unwrap();
        let app = routes(state);

        let response = app
            .clone()
            .oneshot(login_request("ada%40example.com", "hunter2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 900);
        let token = body["access_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(me_request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["badge_number"], "E-1");
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let state = AuthState::new(test_config(), seeded_db().await).unwrap();
        let app = routes(state);

        for (username, password) in [
            ("ada%40example.com", "wrong"),
            ("nobody%40example.com", "hunter2"),
        ] {
            let response = app
                .clone()
                .oneshot(login_request(username, password))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["error"], "Incorrect username or password");
        }
    }

    #[tokio::test]
    async fn guard_rejections_share_one_message() {
        let state = AuthState::new(test_config(), seeded_db().await).unwrap();
        let stale_token = state.tokens.issue_default("ghost@example.com").unwrap();

        let foreign = TokenService::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..test_config()
        });
        let forged_token = foreign.issue_default("ada@example.com").unwrap();

        let app = routes(state);
        let cases = [
            None,
            Some("Bearer not.a.jwt".to_string()),
            Some("Token abc".to_string()),
            Some(format!("Bearer {forged_token}")),
            // Valid signature, but the subject has no account anymore.
            Some(format!("Bearer {stale_token}")),
        ];

        for authorization in cases {
            let response = app
                .clone()
                .oneshot(me_request(authorization.as_deref()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["error"], "Authentication required");
        }
    }

    struct StaticVerifier(&'static str);

    #[async_trait]
    impl FederatedVerifier for StaticVerifier {
        async fn verify(&self, token: &str) -> Option<String> {
            (token == "provider-token").then(|| self.0.to_string())
        }
    }

    fn federated_state(db: Arc<Database>) -> AuthState {
        let config = AuthConfig {
            mode: AuthMode::Federated,
            federated: Some(FederatedConfig {
                verify_url: "http://identity.invalid/verify".to_string(),
                timeout: Duration::from_secs(5),
            }),
            ..test_config()
        };
        let tokens = Arc::new(TokenService::new(&config));
        let authenticator = Arc::new(Authenticator::federated(
            db,
            Arc::new(StaticVerifier("ada@example.com")),
        ));
        AuthState {
            config,
            tokens,
            authenticator,
        }
    }

    #[tokio::test]
    async fn federated_mode_accepts_external_tokens_only() {
        let app = routes(federated_state(seeded_db().await));

        // Password login goes through the strategy-mismatch arm.
        let response = app
            .clone()
            .oneshot(login_request("ada%40example.com", "hunter2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Incorrect username or password");

        // The provider token authenticates requests.
        let response = app
            .clone()
            .oneshot(me_request(Some("Bearer provider-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "ada@example.com");

        // A token the provider rejects gets the guard message.
        let response = app
            .oneshot(me_request(Some("Bearer unknown-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Authentication required");
    }
}
