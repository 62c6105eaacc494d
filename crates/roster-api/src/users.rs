// User account routes.
// Registration is open; reads require authentication.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use roster_contracts::{CreateUserRequest, ErrorResponse, ListResponse, User};
use roster_storage::Database;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{conflict, internal_error, not_found, ApiError, Pagination};
use crate::services::UserService;

/// App state for user routes
#[derive(Clone)]
pub struct UsersState {
    pub db: Arc<Database>,
    pub service: Arc<UserService>,
    pub auth: AuthState,
}

impl UsersState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(UserService::new(db.clone())),
            db,
            auth,
        }
    }
}

impl FromRef<UsersState> for AuthState {
    fn from_ref(input: &UsersState) -> Self {
        input.auth.clone()
    }
}

/// Create user routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/v1/users", post(create_user).get(list_users))
        .route("/v1/users/:user_id", get(get_user))
        .with_state(state)
}

/// POST /v1/users - Register a new account
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 404, description = "Referenced role does not exist", body = ErrorResponse),
        (status = 409, description = "Email or badge number already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<UsersState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let existing = state.db.get_user_by_email(&req.email).await.map_err(|e| {
        tracing::error!("Failed to check email: {}", e);
        internal_error()
    })?;
    if existing.is_some() {
        return Err(conflict("Email already registered"));
    }

    let existing = state
        .db
        .get_user_by_badge_number(&req.badge_number)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check badge number: {}", e);
            internal_error()
        })?;
    if existing.is_some() {
        return Err(conflict("Badge number already registered"));
    }

    for role_id in &req.roles {
        let role = state.db.get_role(*role_id).await.map_err(|e| {
            tracing::error!("Failed to check role: {}", e);
            internal_error()
        })?;
        if role.is_none() {
            return Err(not_found(format!("Role with id {role_id} does not exist")));
        }
    }

    let user = state.service.create(req).await.map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        internal_error()
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /v1/users - List accounts
#[utoipa::path(
    get,
    path = "/v1/users",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum rows to return")
    ),
    responses(
        (status = 200, description = "List of users", body = ListResponse<User>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<UsersState>,
    _auth: AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    let users = state.service.list(page.skip, page.limit).await.map_err(|e| {
        tracing::error!("Failed to list users: {}", e);
        internal_error()
    })?;

    Ok(Json(ListResponse::new(users)))
}

/// GET /v1/users/{user_id} - Get one account
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<UsersState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state.service.get(user_id).await.map_err(|e| {
        tracing::error!("Failed to get user: {}", e);
        internal_error()
    })?;

    user.map(Json).ok_or_else(|| not_found("User not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::test_util::{body_json, fixture, request};

    #[tokio::test]
    async fn register_then_fetch() {
        let fx = fixture().await;
        let app = routes(UsersState::new(fx.db.clone(), fx.auth.clone()));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/v1/users",
                None,
                Some(serde_json::json!({
                    "name": "Grace",
                    "email": "grace@example.com",
                    "badge_number": "E-2",
                    "password": "s3cret",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["email"], "grace@example.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
        let id = body["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(request(
                "GET",
                &format!("/v1/users/{id}"),
                Some(&fx.token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["badge_number"], "E-2");
    }

    #[tokio::test]
    async fn duplicate_email_and_badge_conflict() {
        let fx = fixture().await;
        let app = routes(UsersState::new(fx.db.clone(), fx.auth.clone()));

        // Seeded account holds ada@example.com and badge E-1.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/v1/users",
                None,
                Some(serde_json::json!({
                    "name": "Imposter",
                    "email": "ada@example.com",
                    "badge_number": "E-99",
                    "password": "pw",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"], "Email already registered");

        let response = app
            .oneshot(request(
                "POST",
                "/v1/users",
                None,
                Some(serde_json::json!({
                    "name": "Imposter",
                    "email": "other@example.com",
                    "badge_number": "E-1",
                    "password": "pw",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"],
            "Badge number already registered"
        );
    }

    #[tokio::test]
    async fn unknown_role_id_is_not_found() {
        let fx = fixture().await;
        let app = routes(UsersState::new(fx.db.clone(), fx.auth.clone()));

        let ghost = Uuid::now_v7();
        let response = app
            .oneshot(request(
                "POST",
                "/v1/users",
                None,
                Some(serde_json::json!({
                    "name": "Grace",
                    "email": "grace@example.com",
                    "badge_number": "E-2",
                    "password": "pw",
                    "roles": [ghost],
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            format!("Role with id {ghost} does not exist")
        );
    }

    #[tokio::test]
    async fn reads_require_authentication() {
        let fx = fixture().await;
        let app = routes(UsersState::new(fx.db.clone(), fx.auth.clone()));

        let response = app
            .clone()
            .oneshot(request("GET", "/v1/users", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(request("GET", "/v1/users", Some(&fx.token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
