// License and certification routes. Same shape as educations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use roster_contracts::{
    CreateLicenseRequest, ErrorResponse, License, ListResponse, UpdateLicenseRequest,
};
use roster_storage::{Database, LicenseRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{internal_error, not_found, ApiError};
use crate::employees::{require_employee, require_owned_employee};
use crate::services::LicenseService;

/// App state for license routes
#[derive(Clone)]
pub struct LicensesState {
    pub db: Arc<Database>,
    pub service: Arc<LicenseService>,
    pub auth: AuthState,
}

impl LicensesState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(LicenseService::new(db.clone())),
            db,
            auth,
        }
    }
}

impl FromRef<LicensesState> for AuthState {
    fn from_ref(input: &LicensesState) -> Self {
        input.auth.clone()
    }
}

/// Create license routes
pub fn routes(state: LicensesState) -> Router {
    Router::new()
        .route(
            "/v1/employees/:employee_id/licenses",
            get(list_licenses).post(create_license),
        )
        .route(
            "/v1/licenses/:license_id",
            patch(update_license).delete(delete_license),
        )
        .with_state(state)
}

async fn require_license(db: &Database, license_id: Uuid) -> Result<LicenseRow, ApiError> {
    let license = db.get_license(license_id).await.map_err(|e| {
        tracing::error!("Failed to get license: {}", e);
        internal_error()
    })?;
    license.ok_or_else(|| not_found("License not found"))
}

/// POST /v1/employees/{employee_id}/licenses - Add a license entry
#[utoipa::path(
    post,
    path = "/v1/employees/{employee_id}/licenses",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = CreateLicenseRequest,
    responses(
        (status = 201, description = "License created", body = License),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "licenses"
)]
pub async fn create_license(
    State(state): State<LicensesState>,
    auth: AuthUser,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<CreateLicenseRequest>,
) -> Result<(StatusCode, Json<License>), ApiError> {
    require_owned_employee(&state.db, employee_id, &auth).await?;

    let license = state.service.create(employee_id, req).await.map_err(|e| {
        tracing::error!("Failed to create license: {}", e);
        internal_error()
    })?;

    Ok((StatusCode::CREATED, Json(license)))
}

/// GET /v1/employees/{employee_id}/licenses - List an employee's licenses
#[utoipa::path(
    get,
    path = "/v1/employees/{employee_id}/licenses",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "List of licenses", body = ListResponse<License>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "licenses"
)]
pub async fn list_licenses(
    State(state): State<LicensesState>,
    _auth: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ListResponse<License>>, ApiError> {
    require_employee(&state.db, employee_id).await?;

    let licenses = state
        .service
        .list_for_employee(employee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list licenses: {}", e);
            internal_error()
        })?;

    Ok(Json(ListResponse::new(licenses)))
}

/// PATCH /v1/licenses/{license_id} - Update a license entry
#[utoipa::path(
    patch,
    path = "/v1/licenses/{license_id}",
    params(
        ("license_id" = Uuid, Path, description = "License ID")
    ),
    request_body = UpdateLicenseRequest,
    responses(
        (status = 200, description = "License updated", body = License),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "License not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "licenses"
)]
pub async fn update_license(
    State(state): State<LicensesState>,
    auth: AuthUser,
    Path(license_id): Path<Uuid>,
    Json(req): Json<UpdateLicenseRequest>,
) -> Result<Json<License>, ApiError> {
    let license = require_license(&state.db, license_id).await?;
    require_owned_employee(&state.db, license.employee_id, &auth).await?;

    let updated = state.service.update(license_id, req).await.map_err(|e| {
        tracing::error!("Failed to update license: {}", e);
        internal_error()
    })?;

    updated
        .map(Json)
        .ok_or_else(|| not_found("License not found"))
}

/// DELETE /v1/licenses/{license_id} - Delete a license entry
#[utoipa::path(
    delete,
    path = "/v1/licenses/{license_id}",
    params(
        ("license_id" = Uuid, Path, description = "License ID")
    ),
    responses(
        (status = 204, description = "License deleted"),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "License not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "licenses"
)]
pub async fn delete_license(
    State(state): State<LicensesState>,
    auth: AuthUser,
    Path(license_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let license = require_license(&state.db, license_id).await?;
    require_owned_employee(&state.db, license.employee_id, &auth).await?;

    let deleted = state.service.delete(license_id).await.map_err(|e| {
        tracing::error!("Failed to delete license: {}", e);
        internal_error()
    })?;
    if !deleted {
        return Err(not_found("License not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
