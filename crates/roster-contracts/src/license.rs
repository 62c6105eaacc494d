// License and certification DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A license or certification held by an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct License {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[schema(example = "AWS Solutions Architect")]
    pub license_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}

/// Request to add a license entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateLicenseRequest {
    pub license_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}

/// Request to update a license entry. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateLicenseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}
