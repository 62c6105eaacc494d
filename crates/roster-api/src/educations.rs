// Education routes. Same shape as experiences: nested create/list under an
// employee, direct mutation routes resolved through the owning profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use roster_contracts::{
    CreateEducationRequest, Education, ErrorResponse, ListResponse, UpdateEducationRequest,
};
use roster_storage::{Database, EducationRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{internal_error, not_found, ApiError};
use crate::employees::{require_employee, require_owned_employee};
use crate::services::EducationService;

/// App state for education routes
#[derive(Clone)]
pub struct EducationsState {
    pub db: Arc<Database>,
    pub service: Arc<EducationService>,
    pub auth: AuthState,
}

impl EducationsState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(EducationService::new(db.clone())),
            db,
            auth,
        }
    }
}

impl FromRef<EducationsState> for AuthState {
    fn from_ref(input: &EducationsState) -> Self {
        input.auth.clone()
    }
}

/// Create education routes
pub fn routes(state: EducationsState) -> Router {
    Router::new()
        .route(
            "/v1/employees/:employee_id/educations",
            get(list_educations).post(create_education),
        )
        .route(
            "/v1/educations/:education_id",
            patch(update_education).delete(delete_education),
        )
        .with_state(state)
}

async fn require_education(db: &Database, education_id: Uuid) -> Result<EducationRow, ApiError> {
    let education = db.get_education(education_id).await.map_err(|e| {
        tracing::error!("Failed to get education: {}", e);
        internal_error()
    })?;
    education.ok_or_else(|| not_found("Education not found"))
}

/// POST /v1/employees/{employee_id}/educations - Add an education entry
#[utoipa::path(
    post,
    path = "/v1/employees/{employee_id}/educations",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = CreateEducationRequest,
    responses(
        (status = 201, description = "Education created", body = Education),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "educations"
)]
pub async fn create_education(
    State(state): State<EducationsState>,
    auth: AuthUser,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<CreateEducationRequest>,
) -> Result<(StatusCode, Json<Education>), ApiError> {
    require_owned_employee(&state.db, employee_id, &auth).await?;

    let education = state.service.create(employee_id, req).await.map_err(|e| {
        tracing::error!("Failed to create education: {}", e);
        internal_error()
    })?;

    Ok((StatusCode::CREATED, Json(education)))
}

/// GET /v1/employees/{employee_id}/educations - List an employee's educations
#[utoipa::path(
    get,
    path = "/v1/employees/{employee_id}/educations",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "List of educations", body = ListResponse<Education>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "educations"
)]
pub async fn list_educations(
    State(state): State<EducationsState>,
    _auth: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ListResponse<Education>>, ApiError> {
    require_employee(&state.db, employee_id).await?;

    let educations = state
        .service
        .list_for_employee(employee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list educations: {}", e);
            internal_error()
        })?;

    Ok(Json(ListResponse::new(educations)))
}

/// PATCH /v1/educations/{education_id} - Update an education entry
#[utoipa::path(
    patch,
    path = "/v1/educations/{education_id}",
    params(
        ("education_id" = Uuid, Path, description = "Education ID")
    ),
    request_body = UpdateEducationRequest,
    responses(
        (status = 200, description = "Education updated", body = Education),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Education not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "educations"
)]
pub async fn update_education(
    State(state): State<EducationsState>,
    auth: AuthUser,
    Path(education_id): Path<Uuid>,
    Json(req): Json<UpdateEducationRequest>,
) -> Result<Json<Education>, ApiError> {
    let education = require_education(&state.db, education_id).await?;
    require_owned_employee(&state.db, education.employee_id, &auth).await?;

    let updated = state
        .service
        .update(education_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update education: {}", e);
            internal_error()
        })?;

    updated
        .map(Json)
        .ok_or_else(|| not_found("Education not found"))
}

/// DELETE /v1/educations/{education_id} - Delete an education entry
#[utoipa::path(
    delete,
    path = "/v1/educations/{education_id}",
    params(
        ("education_id" = Uuid, Path, description = "Education ID")
    ),
    responses(
        (status = 204, description = "Education deleted"),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Education not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "educations"
)]
pub async fn delete_education(
    State(state): State<EducationsState>,
    auth: AuthUser,
    Path(education_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let education = require_education(&state.db, education_id).await?;
    require_owned_employee(&state.db, education.employee_id, &auth).await?;

    let deleted = state.service.delete(education_id).await.map_err(|e| {
        tracing::error!("Failed to delete education: {}", e);
        internal_error()
    })?;
    if !deleted {
        return Err(not_found("Education not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
