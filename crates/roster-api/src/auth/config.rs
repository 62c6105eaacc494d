// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: a missing or empty signing secret is a startup error, never a
// generated fallback

use std::time::Duration;

use anyhow::{bail, Context, Result};
use jsonwebtoken::Algorithm;

const DEFAULT_ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);
const DEFAULT_FEDERATED_TIMEOUT: Duration = Duration::from_secs(5);

/// Which authentication strategy the deployment runs. Exactly one is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Email and password against local accounts
    #[default]
    Local,
    /// Tokens verified by an external identity provider
    Federated,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthMode::Local),
            "federated" => Ok(AuthMode::Federated),
            other => bail!("unsupported AUTH_MODE {other:?} (expected \"local\" or \"federated\")"),
        }
    }
}

/// Federated verifier endpoint configuration
#[derive(Debug, Clone)]
pub struct FederatedConfig {
    /// Verification endpoint of the identity provider
    pub verify_url: String,
    /// Request timeout for verification calls
    pub timeout: Duration,
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Secret key for signing and verifying access tokens
    pub jwt_secret: String,
    /// HMAC algorithm used for access tokens
    pub jwt_algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Present iff mode is Federated
    pub federated: Option<FederatedConfig>,
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails when `AUTH_JWT_SECRET` is missing or empty, when `AUTH_MODE`
    /// is unrecognized, or when federated mode lacks a verify URL.
    pub fn from_env() -> Result<Self> {
        let mode = match std::env::var("AUTH_MODE") {
            Ok(s) => AuthMode::from_str(&s)?,
            Err(_) => AuthMode::default(),
        };

        let jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .context("AUTH_JWT_SECRET environment variable required")?;
        if jwt_secret.is_empty() {
            bail!("AUTH_JWT_SECRET must not be empty");
        }

        let jwt_algorithm = match std::env::var("AUTH_JWT_ALGORITHM") {
            Ok(s) => parse_algorithm(&s)?,
            Err(_) => Algorithm::HS256,
        };

        let access_token_lifetime = std::env::var("AUTH_ACCESS_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME);

        let federated = match mode {
            AuthMode::Federated => {
                let verify_url = std::env::var("AUTH_FEDERATED_VERIFY_URL")
                    .context("AUTH_FEDERATED_VERIFY_URL required when AUTH_MODE=federated")?;
                let timeout = std::env::var("AUTH_FEDERATED_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_FEDERATED_TIMEOUT);
                Some(FederatedConfig {
                    verify_url,
                    timeout,
                })
            }
            AuthMode::Local => None,
        };

        Ok(Self {
            mode,
            jwt_secret,
            jwt_algorithm,
            access_token_lifetime,
            federated,
        })
    }
}

/// Parse an HMAC algorithm name. Asymmetric families are rejected since
/// tokens are signed with a shared secret.
fn parse_algorithm(s: &str) -> Result<Algorithm> {
    match s.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!(
            "unsupported AUTH_JWT_ALGORITHM {other:?} (expected HS256, HS384, or HS512)"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_mode_parsing() {
        assert_eq!(AuthMode::from_str("local").unwrap(), AuthMode::Local);
        assert_eq!(AuthMode::from_str("LOCAL").unwrap(), AuthMode::Local);
        assert_eq!(
            AuthMode::from_str("federated").unwrap(),
            AuthMode::Federated
        );
        assert_eq!(
            AuthMode::from_str("Federated").unwrap(),
            AuthMode::Federated
        );
        assert!(AuthMode::from_str("oauth").is_err());
        assert!(AuthMode::from_str("").is_err());
    }

    #[test]
    fn algorithm_parsing_accepts_hmac_only() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("hs384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("none").is_err());
    }
}
