// Employee profile routes.
// A profile belongs to the account that created it; only that account may
// mutate the profile or anything nested under it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use roster_contracts::{
    CreateEmployeeRequest, Employee, ErrorResponse, ListResponse, UpdateEmployeeRequest,
};
use roster_storage::{Database, EmployeeRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{
    conflict, internal_error, not_found, unauthorized, unprocessable, ApiError, Pagination,
};
use crate::services::EmployeeService;

/// App state for employee routes
#[derive(Clone)]
pub struct EmployeesState {
    pub db: Arc<Database>,
    pub service: Arc<EmployeeService>,
    pub auth: AuthState,
}

impl EmployeesState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(EmployeeService::new(db.clone())),
            db,
            auth,
        }
    }
}

impl FromRef<EmployeesState> for AuthState {
    fn from_ref(input: &EmployeesState) -> Self {
        input.auth.clone()
    }
}

/// Create employee routes
pub fn routes(state: EmployeesState) -> Router {
    Router::new()
        .route("/v1/employees", get(list_employees).post(create_employee))
        .route(
            "/v1/employees/:employee_id",
            get(get_employee).patch(update_employee),
        )
        .with_state(state)
}

/// Load an employee or produce the standard 404
pub(crate) async fn require_employee(
    db: &Database,
    employee_id: Uuid,
) -> Result<EmployeeRow, ApiError> {
    let employee = db.get_employee(employee_id).await.map_err(|e| {
        tracing::error!("Failed to get employee: {}", e);
        internal_error()
    })?;
    employee.ok_or_else(|| not_found("Employee not found"))
}

/// Load an employee and confirm it belongs to the requester
pub(crate) async fn require_owned_employee(
    db: &Database,
    employee_id: Uuid,
    auth: &AuthUser,
) -> Result<EmployeeRow, ApiError> {
    let employee = require_employee(db, employee_id).await?;
    if employee.user_id != auth.id {
        return Err(unauthorized(format!(
            "Employee with id {employee_id} does not belong to current user"
        )));
    }
    Ok(employee)
}

/// Reject manager lists that reference the owner or unknown users
async fn validate_managers(
    db: &Database,
    owner_user_id: Uuid,
    manager_ids: &[Uuid],
) -> Result<(), ApiError> {
    for manager_id in manager_ids {
        if *manager_id == owner_user_id {
            return Err(unprocessable("Employee cannot be their own manager"));
        }
        let user = db.get_user(*manager_id).await.map_err(|e| {
            tracing::error!("Failed to check manager: {}", e);
            internal_error()
        })?;
        if user.is_none() {
            return Err(not_found(format!(
                "Manager with id {manager_id} does not exist"
            )));
        }
    }
    Ok(())
}

/// POST /v1/employees - Create the current user's employee profile
#[utoipa::path(
    post,
    path = "/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee profile created", body = Employee),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Referenced manager does not exist", body = ErrorResponse),
        (status = 409, description = "Profile already exists for this user", body = ErrorResponse),
        (status = 422, description = "Employee cannot be their own manager", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<EmployeesState>,
    auth: AuthUser,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let existing = state.db.get_employee_by_user(auth.id).await.map_err(|e| {
        tracing::error!("Failed to check employee profile: {}", e);
        internal_error()
    })?;
    if existing.is_some() {
        return Err(conflict(format!(
            "Employee with user id {} already registered",
            auth.id
        )));
    }

    validate_managers(&state.db, auth.id, &req.managers).await?;

    let employee = state.service.create(auth.id, req).await.map_err(|e| {
        tracing::error!("Failed to create employee: {}", e);
        internal_error()
    })?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /v1/employees - List employee profiles
#[utoipa::path(
    get,
    path = "/v1/employees",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum rows to return")
    ),
    responses(
        (status = 200, description = "List of employees", body = ListResponse<Employee>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<EmployeesState>,
    _auth: AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Employee>>, ApiError> {
    let employees = state
        .service
        .list(page.skip, page.limit)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list employees: {}", e);
            internal_error()
        })?;

    Ok(Json(ListResponse::new(employees)))
}

/// GET /v1/employees/{employee_id} - Get one employee profile
#[utoipa::path(
    get,
    path = "/v1/employees/{employee_id}",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<EmployeesState>,
    _auth: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state.service.get(employee_id).await.map_err(|e| {
        tracing::error!("Failed to get employee: {}", e);
        internal_error()
    })?;

    employee
        .map(Json)
        .ok_or_else(|| not_found("Employee not found"))
}

/// PATCH /v1/employees/{employee_id} - Update the caller's profile
#[utoipa::path(
    patch,
    path = "/v1/employees/{employee_id}",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Employee or referenced manager not found", body = ErrorResponse),
        (status = 422, description = "Employee cannot be their own manager", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    State(state): State<EmployeesState>,
    auth: AuthUser,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    let employee = require_owned_employee(&state.db, employee_id, &auth).await?;

    if let Some(manager_ids) = &req.managers {
        validate_managers(&state.db, employee.user_id, manager_ids).await?;
    }

    let updated = state
        .service
        .update(employee_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update employee: {}", e);
            internal_error()
        })?;

    updated
        .map(Json)
        .ok_or_else(|| not_found("Employee not found"))
}
