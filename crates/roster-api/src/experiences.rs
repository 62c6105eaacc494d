// Work experience routes, including per-experience projects.
// Experiences are nested under an employee for create/list; mutation routes
// address the experience directly and resolve ownership through its owner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use roster_contracts::{
    CreateExperienceProjectRequest, CreateExperienceRequest, ErrorResponse, Experience,
    ExperienceProject, ListResponse, UpdateExperienceRequest,
};
use roster_storage::{Database, ExperienceRow};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthState, AuthUser, FromRef};
use crate::common::{internal_error, not_found, ApiError};
use crate::employees::{require_employee, require_owned_employee};
use crate::services::ExperienceService;

/// App state for experience routes
#[derive(Clone)]
pub struct ExperiencesState {
    pub db: Arc<Database>,
    pub service: Arc<ExperienceService>,
    pub auth: AuthState,
}

impl ExperiencesState {
    pub fn new(db: Arc<Database>, auth: AuthState) -> Self {
        Self {
            service: Arc::new(ExperienceService::new(db.clone())),
            db,
            auth,
        }
    }
}

impl FromRef<ExperiencesState> for AuthState {
    fn from_ref(input: &ExperiencesState) -> Self {
        input.auth.clone()
    }
}

/// Create experience routes
pub fn routes(state: ExperiencesState) -> Router {
    Router::new()
        .route(
            "/v1/employees/:employee_id/experiences",
            get(list_experiences).post(create_experience),
        )
        .route(
            "/v1/experiences/:experience_id",
            patch(update_experience).delete(delete_experience),
        )
        .route(
            "/v1/experiences/:experience_id/projects",
            get(list_projects).post(create_project),
        )
        .with_state(state)
}

async fn require_experience(
    db: &Database,
    experience_id: Uuid,
) -> Result<ExperienceRow, ApiError> {
    let experience = db.get_experience(experience_id).await.map_err(|e| {
        tracing::error!("Failed to get experience: {}", e);
        internal_error()
    })?;
    experience.ok_or_else(|| not_found("Experience not found"))
}

/// POST /v1/employees/{employee_id}/experiences - Add a work experience
#[utoipa::path(
    post,
    path = "/v1/employees/{employee_id}/experiences",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = CreateExperienceRequest,
    responses(
        (status = 201, description = "Experience created", body = Experience),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn create_experience(
    State(state): State<ExperiencesState>,
    auth: AuthUser,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<CreateExperienceRequest>,
) -> Result<(StatusCode, Json<Experience>), ApiError> {
    require_owned_employee(&state.db, employee_id, &auth).await?;

    let experience = state
        .service
        .create(employee_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create experience: {}", e);
            internal_error()
        })?;

    Ok((StatusCode::CREATED, Json(experience)))
}

/// GET /v1/employees/{employee_id}/experiences - List an employee's experiences
#[utoipa::path(
    get,
    path = "/v1/employees/{employee_id}/experiences",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "List of experiences", body = ListResponse<Experience>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn list_experiences(
    State(state): State<ExperiencesState>,
    _auth: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<ListResponse<Experience>>, ApiError> {
    require_employee(&state.db, employee_id).await?;

    let experiences = state
        .service
        .list_for_employee(employee_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list experiences: {}", e);
            internal_error()
        })?;

    Ok(Json(ListResponse::new(experiences)))
}

/// PATCH /v1/experiences/{experience_id} - Update a work experience
#[utoipa::path(
    patch,
    path = "/v1/experiences/{experience_id}",
    params(
        ("experience_id" = Uuid, Path, description = "Experience ID")
    ),
    request_body = UpdateExperienceRequest,
    responses(
        (status = 200, description = "Experience updated", body = Experience),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Experience not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn update_experience(
    State(state): State<ExperiencesState>,
    auth: AuthUser,
    Path(experience_id): Path<Uuid>,
    Json(req): Json<UpdateExperienceRequest>,
) -> Result<Json<Experience>, ApiError> {
    let experience = require_experience(&state.db, experience_id).await?;
    require_owned_employee(&state.db, experience.employee_id, &auth).await?;

    let updated = state
        .service
        .update(experience_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update experience: {}", e);
            internal_error()
        })?;

    updated
        .map(Json)
        .ok_or_else(|| not_found("Experience not found"))
}

/// DELETE /v1/experiences/{experience_id} - Delete a work experience
#[utoipa::path(
    delete,
    path = "/v1/experiences/{experience_id}",
    params(
        ("experience_id" = Uuid, Path, description = "Experience ID")
    ),
    responses(
        (status = 204, description = "Experience deleted"),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Experience not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn delete_experience(
    State(state): State<ExperiencesState>,
    auth: AuthUser,
    Path(experience_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let experience = require_experience(&state.db, experience_id).await?;
    require_owned_employee(&state.db, experience.employee_id, &auth).await?;

    let deleted = state.service.delete(experience_id).await.map_err(|e| {
        tracing::error!("Failed to delete experience: {}", e);
        internal_error()
    })?;
    if !deleted {
        return Err(not_found("Experience not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/experiences/{experience_id}/projects - Add a project
#[utoipa::path(
    post,
    path = "/v1/experiences/{experience_id}/projects",
    params(
        ("experience_id" = Uuid, Path, description = "Experience ID")
    ),
    request_body = CreateExperienceProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ExperienceProject),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Experience not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn create_project(
    State(state): State<ExperiencesState>,
    auth: AuthUser,
    Path(experience_id): Path<Uuid>,
    Json(req): Json<CreateExperienceProjectRequest>,
) -> Result<(StatusCode, Json<ExperienceProject>), ApiError> {
    let experience = require_experience(&state.db, experience_id).await?;
    require_owned_employee(&state.db, experience.employee_id, &auth).await?;

    let project = state
        .service
        .create_project(experience_id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create project: {}", e);
            internal_error()
        })?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /v1/experiences/{experience_id}/projects - List an experience's projects
#[utoipa::path(
    get,
    path = "/v1/experiences/{experience_id}/projects",
    params(
        ("experience_id" = Uuid, Path, description = "Experience ID")
    ),
    responses(
        (status = 200, description = "List of projects", body = ListResponse<ExperienceProject>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Experience not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "experiences"
)]
pub async fn list_projects(
    State(state): State<ExperiencesState>,
    _auth: AuthUser,
    Path(experience_id): Path<Uuid>,
) -> Result<Json<ListResponse<ExperienceProject>>, ApiError> {
    require_experience(&state.db, experience_id).await?;

    let projects = state
        .service
        .list_projects(experience_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list projects: {}", e);
            internal_error()
        })?;

    Ok(Json(ListResponse::new(projects)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use roster_storage::CreateEmployee;
    use tower::ServiceExt;

    use crate::test_util::{body_json, fixture, request, seed_user, token_for, Fixture};

    async fn seed_employee(fx: &Fixture) -> Uuid {
        fx.db
            .create_employee(CreateEmployee {
                user_id: fx.user.id,
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_and_list_under_employee() {
        let fx = fixture().await;
        let employee_id = seed_employee(&fx).await;
        let app = routes(ExperiencesState::new(fx.db.clone(), fx.auth.clone()));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/employees/{employee_id}/experiences"),
                Some(&fx.token),
                Some(serde_json::json!({
                    "company_name": "Acme Corp",
                    "position": "Engineer",
                    "start_date": "2020-01-15",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["company_name"], "Acme Corp");
        assert_eq!(body["start_date"], "2020-01-15");

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/v1/employees/{employee_id}/experiences"),
                Some(&fx.token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

        // Listing under a missing employee is a 404, not an empty list.
        let response = app
            .oneshot(request(
                "GET",
                &format!("/v1/employees/{}/experiences", Uuid::now_v7()),
                Some(&fx.token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Employee not found");
    }

    #[tokio::test]
    async fn mutations_are_owner_only() {
        let fx = fixture().await;
        let employee_id = seed_employee(&fx).await;
        seed_user(&fx.db, "Grace", "grace@example.com", "E-2").await;
        let other_token = token_for(&fx.auth, "grace@example.com");
        let app = routes(ExperiencesState::new(fx.db.clone(), fx.auth.clone()));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/employees/{employee_id}/experiences"),
                Some(&fx.token),
                Some(serde_json::json!({"company_name": "Acme Corp"})),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        // Another account cannot create, update, or delete here.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/employees/{employee_id}/experiences"),
                Some(&other_token),
                Some(serde_json::json!({"company_name": "Intruder Inc"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"],
            format!("Employee with id {employee_id} does not belong to current user")
        );

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/v1/experiences/{id}"),
                Some(&other_token),
                Some(serde_json::json!({"position": "CTO"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // The owner can, and delete answers 204 with no body.
        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/v1/experiences/{id}"),
                Some(&fx.token),
                Some(serde_json::json!({"position": "Senior Engineer"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["position"], "Senior Engineer");

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/v1/experiences/{id}"),
                Some(&fx.token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request(
                "PATCH",
                &format!("/v1/experiences/{id}"),
                Some(&fx.token),
                Some(serde_json::json!({"position": "Ghost"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Experience not found");
    }

    #[tokio::test]
    async fn projects_resolve_tags_through_catalogs() {
        let fx = fixture().await;
        let employee_id = seed_employee(&fx).await;
        let app = routes(ExperiencesState::new(fx.db.clone(), fx.auth.clone()));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/employees/{employee_id}/experiences"),
                Some(&fx.token),
                Some(serde_json::json!({"company_name": "Acme Corp"})),
            ))
            .await
            .unwrap();
        let experience_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/experiences/{experience_id}/projects"),
                Some(&fx.token),
                Some(serde_json::json!({
                    "name": "Billing service",
                    "team_size": 4,
                    "programming_languages": ["Rust", "Python"],
                    "frameworks": ["axum"],
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["programming_languages"], serde_json::json!(["Python", "Rust"]));
        assert_eq!(body["frameworks"], serde_json::json!(["axum"]));
        assert_eq!(body["servers"], serde_json::json!([]));

        // A second project reuses the catalog entry for "Rust".
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/v1/experiences/{experience_id}/projects"),
                Some(&fx.token),
                Some(serde_json::json!({
                    "name": "Ingest pipeline",
                    "programming_languages": ["Rust"],
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request(
                "GET",
                &format!("/v1/experiences/{experience_id}/projects"),
                Some(&fx.token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn project_routes_need_an_existing_experience() {
        let fx = fixture().await;
        seed_employee(&fx).await;
        let app = routes(ExperiencesState::new(fx.db.clone(), fx.auth.clone()));

        let ghost = Uuid::now_v7();
        let response = app
            .oneshot(request(
                "POST",
                &format!("/v1/experiences/{ghost}/projects"),
                Some(&fx.token),
                Some(serde_json::json!({"name": "Orphan"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Experience not found");
    }
}
