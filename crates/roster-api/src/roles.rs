// Role catalog routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use roster_contracts::{CreateRoleRequest, ErrorResponse, ListResponse, Role};
use roster_storage::Database;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{conflict, internal_error, not_found, ApiError, Pagination};
use crate::services::RoleService;

/// App state for role routes
#[derive(Clone)]
pub struct RolesState {
    pub service: Arc<RoleService>,
    pub auth: AuthState,
}

impl RolesState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(RoleService::new(db)),
            auth,
        }
    }
}

impl FromRef<RolesState> for AuthState {
    fn from_ref(input: &RolesState) -> Self {
        input.auth.clone()
    }
}

/// Create role routes
pub fn routes(state: RolesState) -> Router {
    Router::new()
        .route("/v1/roles", post(create_role).get(list_roles))
        .route("/v1/roles/:role_id", get(get_role))
        .with_state(state)
}

/// POST /v1/roles - Create a role
#[utoipa::path(
    post,
    path = "/v1/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn create_role(
    State(state): State<RolesState>,
    _auth: AuthUser,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    let existing = state.service.get_by_name(&req.name).await.map_err(|e| {
        tracing::error!("Failed to check role name: {}", e);
        internal_error()
    })?;
    if existing.is_some() {
        return Err(conflict("Role name already registered"));
    }

    let role = state.service.create(req).await.map_err(|e| {
        tracing::error!("Failed to create role: {}", e);
        internal_error()
    })?;

    Ok((StatusCode::CREATED, Json(role)))
}

/// GET /v1/roles - List roles
#[utoipa::path(
    get,
    path = "/v1/roles",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum rows to return")
    ),
    responses(
        (status = 200, description = "List of roles", body = ListResponse<Role>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn list_roles(
    State(state): State<RolesState>,
    _auth: AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Role>>, ApiError> {
    let roles = state.service.list(page.skip, page.limit).await.map_err(|e| {
        tracing::error!("Failed to list roles: {}", e);
        internal_error()
    })?;

    Ok(Json(ListResponse::new(roles)))
}

/// GET /v1/roles/{role_id} - Get one role
#[utoipa::path(
    get,
    path = "/v1/roles/{role_id}",
    params(
        ("role_id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn get_role(
    State(state): State<RolesState>,
    _auth: AuthUser,
    Path(role_id): Path<Uuid>,
) -> Result<Json<Role>, ApiError> {
    let role = state.service.get(role_id).await.map_err(|e| {
        tracing::error!("Failed to get role: {}", e);
        internal_error()
    })?;

    role.map(Json).ok_or_else(|| not_found("Role not found"))
}
