// Credential verification.
// Decision: one strategy per deployment. A credential kind that does not
// match the configured strategy is rejected like any bad credential, so
// password login is inert in federated deployments.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::header;
use roster_storage::{password, Database, UserRow};
use serde::Deserialize;

use super::guard::AuthUser;

/// A credential presented by a client
#[derive(Debug, Clone)]
pub enum Credential {
    /// Email and password, accepted in local mode
    Password { email: String, password: String },
    /// An opaque token minted elsewhere, accepted in federated mode
    External { token: String },
}

/// Resolves an external token to the email it belongs to.
///
/// `None` covers every failure: unreachable provider, non-success status,
/// unusable body. Callers treat all of them as a rejected credential.
#[async_trait]
pub trait FederatedVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<String>;
}

/// Verifier that calls an identity provider's verification endpoint
pub struct HttpFederatedVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpFederatedVerifier {
    pub fn new(verify_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, verify_url })
    }
}

#[derive(Debug, Deserialize)]
struct FederatedVerifyResponse {
    #[serde(rename = "Email")]
    email: String,
}

#[async_trait]
impl FederatedVerifier for HttpFederatedVerifier {
    async fn verify(&self, token: &str) -> Option<String> {
        // The provider expects the bare token, not a Bearer scheme.
        let response = match self
            .client
            .get(&self.verify_url)
            .header(header::AUTHORIZATION, token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Federated verify request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Federated verify rejected token");
            return None;
        }

        match response.json::<FederatedVerifyResponse>().await {
            Ok(body) => Some(body.email),
            Err(e) => {
                tracing::debug!("Federated verify returned an unusable body: {}", e);
                None
            }
        }
    }
}

/// The active verification strategy
pub enum Strategy {
    Local,
    Federated(Arc<dyn FederatedVerifier>),
}

/// Turns credentials into authenticated identities
pub struct Authenticator {
    db: Arc<Database>,
    strategy: Strategy,
}

impl Authenticator {
    pub fn local(db: Arc<Database>) -> Self {
        Self {
            db,
            strategy: Strategy::Local,
        }
    }

    pub fn federated(db: Arc<Database>, verifier: Arc<dyn FederatedVerifier>) -> Self {
        Self {
            db,
            strategy: Strategy::Federated(verifier),
        }
    }

    /// Verify a credential. `Ok(None)` means rejected; the reasons are
    /// logged but never surfaced to the client.
    pub async fn authenticate(&self, credential: Credential) -> Result<Option<AuthUser>> {
        match (&self.strategy, credential) {
            (Strategy::Local, Credential::Password { email, password }) => {
                let Some(user) = self.db.get_user_by_email(&email).await? else {
                    tracing::debug!(%email, "Login attempt for unknown email");
                    return Ok(None);
                };

                let valid = password::verify_password(&password, &user.password_hash)
                    .unwrap_or_else(|e| {
                        tracing::error!("Password verification error: {}", e);
                        false
                    });
                if !valid {
                    tracing::debug!(%email, "Login attempt with wrong password");
                    return Ok(None);
                }

                Ok(Some(self.identity(user).await?))
            }
            (Strategy::Federated(verifier), Credential::External { token }) => {
                let Some(email) = verifier.verify(&token).await else {
                    return Ok(None);
                };

                let Some(user) = self.db.get_user_by_email(&email).await? else {
                    tracing::debug!(%email, "Federated identity has no local account");
                    return Ok(None);
                };

                Ok(Some(self.identity(user).await?))
            }
            _ => {
                tracing::debug!("Credential kind does not match the configured auth mode");
                Ok(None)
            }
        }
    }

    /// Resolve an already-verified subject to its identity. Used by the
    /// request guard after token verification.
    pub async fn identity_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let Some(user) = self.db.get_user_by_email(email).await? else {
            return Ok(None);
        };
        Ok(Some(self.identity(user).await?))
    }

    async fn identity(&self, user: UserRow) -> Result<AuthUser> {
        let roles = self
            .db
            .list_roles_for_user(user.id)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            name: user.name,
            badge_number: user.badge_number,
            roles,
        })
    }
}
