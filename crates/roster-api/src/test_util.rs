// Shared fixtures for route tests: an in-memory database seeded with one
// account, a local-mode auth stack, and a bearer token for that account.

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use roster_storage::password::hash_password;
use roster_storage::{CreateUser, Database, UserRow};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthConfig, AuthMode, AuthState};

pub(crate) struct Fixture {
    pub db: Arc<Database>,
    pub auth: AuthState,
    pub user: UserRow,
    pub token: String,
}

/// In-memory database with one account (ada@example.com / hunter2) and a
/// token already issued for it.
pub(crate) async fn fixture() -> Fixture {
    let db = Arc::new(Database::in_memory());
    let user = seed_user(&db, "Ada", "ada@example.com", "E-1").await;

    let config = AuthConfig {
        mode: AuthMode::Local,
        jwt_secret: "test-secret".to_string(),
        jwt_algorithm: Algorithm::HS256,
        access_token_lifetime: Duration::from_secs(900),
        federated: None,
    };
    let auth = AuthState::new(config, db.clone()).unwrap();
    let token = token_for(&auth, &user.email);

    Fixture {
        db,
        auth,
        user,
        token,
    }
}

/// Insert an account with password "hunter2" and no roles.
pub(crate) async fn seed_user(
    db: &Arc<Database>,
    name: &str,
    email: &str,
    badge_number: &str,
) -> UserRow {
    db.create_user(CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        badge_number: badge_number.to_string(),
        password_hash: hash_password("hunter2").unwrap(),
        role_ids: Vec::new(),
    })
    .await
    .unwrap()
}

pub(crate) fn token_for(auth: &AuthState, email: &str) -> String {
    auth.tokens.issue_default(email).unwrap()
}

/// Build a request, attaching a bearer token and a JSON body when given.
pub(crate) fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
