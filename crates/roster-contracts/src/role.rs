// Role DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A named role that can be assigned to users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    /// Unique role label, e.g. "admin" or "hr"
    #[schema(example = "admin")]
    pub name: String,
}

/// Request to create a new role
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    #[schema(example = "admin")]
    pub name: String,
}
