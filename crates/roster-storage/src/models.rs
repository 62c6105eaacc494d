// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Users and roles
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub badge_number: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub badge_number: String,
    pub password_hash: String,
    /// Roles to assign on creation. Callers validate existence beforehand.
    pub role_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
}

// ============================================
// Employee profiles
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub job_position: Option<String>,
    pub department: Option<String>,
    pub work_location: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateEmployee {
    pub user_id: Uuid,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub job_position: Option<String>,
    pub department: Option<String>,
    pub work_location: Option<String>,
    pub summary: Option<String>,
    /// User IDs of managers. Callers validate existence beforehand.
    pub manager_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub job_position: Option<String>,
    pub department: Option<String>,
    pub work_location: Option<String>,
    pub summary: Option<String>,
    /// Replaces the manager set when present
    pub manager_ids: Option<Vec<Uuid>>,
}

// ============================================
// Work experiences and projects
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub company_name: String,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateExperience {
    pub employee_id: Uuid,
    pub company_name: String,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateExperience {
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceProjectRow {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub name: String,
    pub overview: Option<String>,
    pub team_size: Option<i32>,
    pub website: Option<String>,
    pub position: Option<String>,
    pub responsibility: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateExperienceProject {
    pub experience_id: Uuid,
    pub name: String,
    pub overview: Option<String>,
    pub team_size: Option<i32>,
    pub website: Option<String>,
    pub position: Option<String>,
    pub responsibility: Option<String>,
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub servers: Vec<String>,
}

/// Technology tags attached to a project, resolved to catalog names
#[derive(Debug, Clone, Default)]
pub struct ProjectTags {
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub servers: Vec<String>,
}

// ============================================
// Educations and licenses
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub institute_name: String,
    pub degree: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEducation {
    pub employee_id: Uuid,
    pub institute_name: String,
    pub degree: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEducation {
    pub institute_name: Option<String>,
    pub degree: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LicenseRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub license_name: String,
    pub issuing_organization: Option<String>,
    pub credential_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub credential_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateLicense {
    pub employee_id: Uuid,
    pub license_name: String,
    pub issuing_organization: Option<String>,
    pub credential_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLicense {
    pub license_name: Option<String>,
    pub issuing_organization: Option<String>,
    pub credential_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub credential_url: Option<String>,
}
