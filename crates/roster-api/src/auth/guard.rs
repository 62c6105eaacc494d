// Request authentication guard.
// Decision: every rejection yields the same 401 body so callers cannot
// probe which check failed. The distinct reasons go to debug logs only.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::authenticator::Credential;
use super::config::AuthMode;
use super::routes::AuthState;

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Authenticated user context extracted from a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub badge_number: String,
    pub roles: Vec<String>,
}

/// Helper trait for extracting AuthState from module states
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Extractor for the authenticated user. Returns 401 if the request does
/// not carry a valid credential.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_user(parts, &auth_state).await
    }
}

fn rejected() -> AuthError {
    AuthError::unauthorized("Authentication required")
}

async fn extract_auth_user(
    parts: &mut Parts,
    auth_state: &AuthState,
) -> Result<AuthUser, AuthError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        tracing::debug!("Missing authorization header");
        return Err(rejected());
    };

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::debug!("Authorization header is not valid UTF-8");
        rejected()
    })?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        tracing::debug!("Authorization header does not carry a bearer token");
        return Err(rejected());
    };

    match auth_state.config.mode {
        AuthMode::Local => {
            let email = auth_state.tokens.verify(token).map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                rejected()
            })?;

            auth_state
                .authenticator
                .identity_by_email(&email)
                .await
                .map_err(|e| {
                    tracing::error!("Identity lookup failed: {}", e);
                    rejected()
                })?
                .ok_or_else(|| {
                    tracing::debug!(%email, "Token subject no longer exists");
                    rejected()
                })
        }
        AuthMode::Federated => auth_state
            .authenticator
            .authenticate(Credential::External {
                token: token.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::error!("Federated authentication failed: {}", e);
                rejected()
            })?
            .ok_or_else(rejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_serializes_message_only() {
        let error = AuthError::unauthorized("Authentication required");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"error":"Authentication required"}"#);
    }
}
