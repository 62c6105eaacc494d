// Roster API server
// Decision: one authentication strategy per deployment, selected at startup

mod auth;
mod common;
mod educations;
mod employees;
mod experiences;
mod licenses;
mod roles;
mod services;
#[cfg(test)]
mod test_util;
mod users;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use roster_contracts::*;
use roster_storage::Database;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthConfig, AuthState};

/// Origin the bundled frontend is served from during development
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: String,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode.clone(),
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::login,
        auth::routes::me,
        users::create_user,
        users::list_users,
        users::get_user,
        roles::create_role,
        roles::list_roles,
        roles::get_role,
        employees::create_employee,
        employees::list_employees,
        employees::get_employee,
        employees::update_employee,
        experiences::create_experience,
        experiences::list_experiences,
        experiences::update_experience,
        experiences::delete_experience,
        experiences::create_project,
        experiences::list_projects,
        educations::create_education,
        educations::list_educations,
        educations::update_education,
        educations::delete_education,
        licenses::create_license,
        licenses::list_licenses,
        licenses::update_license,
        licenses::delete_license,
    ),
    components(
        schemas(
            User, CreateUserRequest,
            Role, CreateRoleRequest,
            Employee, CreateEmployeeRequest, UpdateEmployeeRequest,
            Experience, CreateExperienceRequest, UpdateExperienceRequest,
            ExperienceProject, CreateExperienceProjectRequest,
            Education, CreateEducationRequest, UpdateEducationRequest,
            License, CreateLicenseRequest, UpdateLicenseRequest,
            ErrorResponse,
            ListResponse<User>,
            ListResponse<Role>,
            ListResponse<Employee>,
            ListResponse<Experience>,
            ListResponse<ExperienceProject>,
            ListResponse<Education>,
            ListResponse<License>,
            auth::routes::LoginRequest,
            auth::routes::TokenResponse,
            auth::routes::UserInfoResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Account management endpoints"),
        (name = "roles", description = "Role catalog endpoints"),
        (name = "employees", description = "Employee profile endpoints"),
        (name = "experiences", description = "Work experience and project endpoints"),
        (name = "educations", description = "Education endpoints"),
        (name = "licenses", description = "License and certification endpoints")
    ),
    info(
        title = "Roster API",
        version = "0.1.0",
        description = "API for managing employee accounts, profiles, and work history",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("roster-api starting...");

    // Initialize storage. STORAGE_MODE=memory runs without Postgres.
    let storage_mode = std::env::var("STORAGE_MODE").unwrap_or_default();
    let db = if storage_mode.eq_ignore_ascii_case("memory") {
        tracing::info!("Using in-memory storage (data is not persisted)");
        Database::in_memory()
    } else {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
        let db = Database::postgres(&database_url)
            .await
            .context("Failed to connect to database")?;
        tracing::info!("Connected to database");
        db
    };
    let db = Arc::new(db);

    // Load authentication configuration
    let auth_config = AuthConfig::from_env().context("Failed to load auth configuration")?;
    tracing::info!(mode = ?auth_config.mode, "Authentication configured");

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/employees
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment.
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    tracing::info!(origins = ?cors_origins, "CORS origins configured");

    let app = build_app(db, auth_config, &api_prefix)?;

    // Add CORS
    let app = app.layer(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(cors_origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                header::ORIGIN,
                header::CACHE_CONTROL,
            ])
            .allow_credentials(true),
    );

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = "0.0.0.0:9000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Assemble the full application router (extracted for testing)
fn build_app(db: Arc<Database>, auth_config: AuthConfig, api_prefix: &str) -> Result<Router> {
    let health_state = HealthState {
        auth_mode: format!("{:?}", auth_config.mode),
    };
    let auth_state = AuthState::new(auth_config, db.clone())?;

    let users_state = users::UsersState::new(db.clone(), auth_state.clone());
    let roles_state = roles::RolesState::new(db.clone(), auth_state.clone());
    let employees_state = employees::EmployeesState::new(db.clone(), auth_state.clone());
    let experiences_state = experiences::ExperiencesState::new(db.clone(), auth_state.clone());
    let educations_state = educations::EducationsState::new(db.clone(), auth_state.clone());
    let licenses_state = licenses::LicensesState::new(db, auth_state.clone());

    let api_routes = Router::new()
        .merge(users::routes(users_state))
        .merge(roles::routes(roles_state))
        .merge(employees::routes(employees_state))
        .merge(experiences::routes(experiences_state))
        .merge(educations::routes(educations_state))
        .merge(licenses::routes(licenses_state));

    // Health and auth are never prefixed; the API surface may be.
    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(auth::routes(auth_state))
        .merge(build_router_with_prefix(api_routes, api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    Ok(app)
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::body::Body;
    use http_body_util::BodyExt;
    use jsonwebtoken::Algorithm;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::auth::AuthMode;
    use crate::test_util::{body_json, request};

    fn test_app() -> Router {
        let config = AuthConfig {
            mode: AuthMode::Local,
            jwt_secret: "test-secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::from_secs(900),
            federated: None,
        };
        build_app(Arc::new(Database::in_memory()), config, "").unwrap()
    }

    fn test_routes() -> Router {
        Router::new().route("/v1/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn health_is_open_and_reports_auth_mode() {
        let app = test_app();

        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["auth_mode"], "Local");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = test_app();

        let response = app
            .oneshot(request("GET", "/api-doc/openapi.json", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["info"]["title"], "Roster API");
        assert!(body["paths"]["/v1/auth/login"].is_object());
    }

    #[tokio::test]
    async fn register_login_and_work_with_roles() {
        let app = test_app();

        // Registration is open.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/v1/users",
                None,
                Some(serde_json::json!({
                    "name": "Ada",
                    "email": "ada@example.com",
                    "badge_number": "E-1",
                    "password": "hunter2",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Token login with form credentials.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("username=ada%40example.com&password=hunter2"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("GET", "/v1/auth/me", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["email"], "ada@example.com");

        // Authenticated accounts can create roles; names are unique.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/v1/roles",
                Some(&token),
                Some(serde_json::json!({"name": "admin"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request(
                "POST",
                "/v1/roles",
                Some(&token),
                Some(serde_json::json!({"name": "admin"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"],
            "Role name already registered"
        );
    }
}
