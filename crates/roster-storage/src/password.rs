//! Password hashing with Argon2id.
//!
//! Plaintext passwords never reach a repository. Callers hash at the
//! registration boundary and store only the PHC-format string.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash
/// itself is unparseable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
