// User DTOs
// The password is accepted on registration only and never serialized back.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::role::Role;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    /// Company badge number, unique per user
    #[schema(example = "B-10423")]
    pub badge_number: String,
    /// Roles held by this user
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Request to register a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "B-10423")]
    pub badge_number: String,
    /// Plaintext password; stored only as an Argon2id hash
    pub password: String,
    /// IDs of roles to assign. All referenced roles must exist.
    #[serde(default)]
    pub roles: Vec<Uuid>,
}
