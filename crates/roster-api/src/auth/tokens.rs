// Access token issuance and verification.
// Decision: stateless HMAC-signed JWTs, no server-side session state and
// no revocation list. Expiry is the only exit.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::config::AuthConfig;

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject, the account email
    sub: String,
    /// Issued at (unix seconds)
    iat: i64,
    /// Expiration (unix seconds)
    exp: i64,
}

/// Why a token failed verification. Callers that log can tell the two
/// apart; the HTTP response does not.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Signs and verifies access tokens with a secret fixed at startup
pub struct TokenService {
    algorithm: Algorithm,
    lifetime: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            algorithm: config.jwt_algorithm,
            lifetime: config.access_token_lifetime,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Issue a token for `subject` valid for `lifetime` from now
    pub fn issue(&self, subject: &str, lifetime: Duration) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + lifetime.as_secs() as i64,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Issue a token with the configured default lifetime
    pub fn issue_default(&self, subject: &str) -> Result<String> {
        self.issue(subject, self.lifetime)
    }

    pub fn default_lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Verify a token and return its subject.
    ///
    /// An expired signature reports as `Expired`; every other defect,
    /// wrong key and wrong algorithm included, reports as `Malformed`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // The library defaults to 60 seconds of clock-skew leeway. A token
        // past its exp must fail immediately.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, algorithm: Algorithm) -> TokenService {
        TokenService::new(&AuthConfig {
            mode: super::super::config::AuthMode::Local,
            jwt_secret: secret.to_string(),
            jwt_algorithm: algorithm,
            access_token_lifetime: Duration::from_secs(900),
            federated: None,
        })
    }

    /// Encode claims directly so tests can fabricate tokens with arbitrary
    /// timestamps.
    fn raw_token(secret: &str, algorithm: Algorithm, sub: &str, iat: i64, exp: i64) -> String {
        encode(
            &Header::new(algorithm),
            &Claims {
                sub: sub.to_string(),
                iat,
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let svc = service("secret", Algorithm::HS256);
        let token = svc.issue("ada@example.com", Duration::from_secs(900)).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), "ada@example.com");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let svc = service("secret", Algorithm::HS256);
        let now = Utc::now().timestamp();
        let token = raw_token("secret", Algorithm::HS256, "ada@example.com", now - 7200, now - 3600);
        assert!(matches!(svc.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn no_leeway_for_recently_expired_tokens() {
        // Thirty seconds past exp sits inside the library's default 60s
        // leeway window. It must still be rejected.
        let svc = service("secret", Algorithm::HS256);
        let now = Utc::now().timestamp();
        let token = raw_token("secret", Algorithm::HS256, "ada@example.com", now - 900, now - 30);
        assert!(matches!(svc.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn wrong_key_is_malformed() {
        let svc = service("secret", Algorithm::HS256);
        let now = Utc::now().timestamp();
        let token = raw_token("other-secret", Algorithm::HS256, "ada@example.com", now, now + 900);
        assert!(matches!(svc.verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn wrong_algorithm_is_malformed() {
        let svc = service("secret", Algorithm::HS256);
        let now = Utc::now().timestamp();
        let token = raw_token("secret", Algorithm::HS512, "ada@example.com", now, now + 900);
        assert!(matches!(svc.verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service("secret", Algorithm::HS256);
        assert!(matches!(svc.verify("not.a.jwt"), Err(TokenError::Malformed)));
        assert!(matches!(svc.verify(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn hs384_and_hs512_roundtrip() {
        for algorithm in [Algorithm::HS384, Algorithm::HS512] {
            let svc = service("secret", algorithm);
            let token = svc.issue_default("ada@example.com").unwrap();
            assert_eq!(svc.verify(&token).unwrap(), "ada@example.com");
        }
    }
}
