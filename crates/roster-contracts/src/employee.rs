// Employee profile DTOs
// An employee row is owned by exactly one user; managers reference other users.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::user::User;

/// An employee profile attached to a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    /// Owning user account
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Backend Engineer")]
    pub job_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Users this employee reports to
    #[serde(default)]
    pub managers: Vec<User>,
}

/// Request to create an employee profile for the current user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// User IDs of managers. Every ID must refer to an existing user and
    /// cannot be the owning user itself.
    #[serde(default)]
    pub managers: Vec<Uuid>,
}

/// Request to update an employee profile. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Replaces the manager list when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managers: Option<Vec<Uuid>>,
}
