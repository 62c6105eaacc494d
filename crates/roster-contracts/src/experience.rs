// Work experience DTOs
// Experiences belong to an employee; projects belong to an experience and
// carry technology tags resolved against shared catalogs by name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

/// A work experience entry on an employee profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Experience {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[schema(example = "Acme Corp")]
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to add a work experience entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateExperienceRequest {
    #[schema(example = "Acme Corp")]
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update a work experience entry. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateExperienceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A project carried out during a work experience
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceProject {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<String>,
    /// Programming language tags, by catalog name
    #[serde(default)]
    #[schema(example = json!(["Rust", "Python"]))]
    pub programming_languages: Vec<String>,
    /// Framework tags, by catalog name
    #[serde(default)]
    #[schema(example = json!(["axum"]))]
    pub frameworks: Vec<String>,
    /// Server/platform tags, by catalog name
    #[serde(default)]
    #[schema(example = json!(["PostgreSQL"]))]
    pub servers: Vec<String>,
}

/// Request to add a project to a work experience
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateExperienceProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<String>,
    /// Tags are created in the shared catalogs when not already present
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub servers: Vec<String>,
}
