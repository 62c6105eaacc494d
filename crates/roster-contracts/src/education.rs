// Education DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An education entry on an employee profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Education {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[schema(example = "State University")]
    pub institute_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "BSc Computer Science")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to add an education entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEducationRequest {
    pub institute_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update an education entry. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEducationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
