//! Backend selection.
//!
//! `Database` is the single handle the API layer talks to. Postgres is the
//! production backend; the in-memory store covers tests and local runs
//! without a database server.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::memory::InMemoryStore;
use crate::models::*;
use crate::postgres::PgDatabase;

#[derive(Clone)]
pub enum Database {
    Postgres(PgDatabase),
    InMemory(Arc<InMemoryStore>),
}

impl Database {
    /// Connect to Postgres and run pending migrations.
    pub async fn postgres(database_url: &str) -> Result<Self> {
        Ok(Self::Postgres(PgDatabase::from_url(database_url).await?))
    }

    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryStore::new()))
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(store) => store.create_user(input),
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(store) => store.get_user(id),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_email(email).await,
            Self::InMemory(store) => store.get_user_by_email(email),
        }
    }

    pub async fn get_user_by_badge_number(&self, badge_number: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_badge_number(badge_number).await,
            Self::InMemory(store) => store.get_user_by_badge_number(badge_number),
        }
    }

    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<UserRow>> {
        match self {
            Self::Postgres(db) => db.list_users(skip, limit).await,
            Self::InMemory(store) => store.list_users(skip, limit),
        }
    }

    pub async fn list_roles_for_user(&self, user_id: Uuid) -> Result<Vec<RoleRow>> {
        match self {
            Self::Postgres(db) => db.list_roles_for_user(user_id).await,
            Self::InMemory(store) => store.list_roles_for_user(user_id),
        }
    }

    // ============================================
    // Roles
    // ============================================

    pub async fn create_role(&self, input: CreateRole) -> Result<RoleRow> {
        match self {
            Self::Postgres(db) => db.create_role(input).await,
            Self::InMemory(store) => store.create_role(input),
        }
    }

    pub async fn get_role(&self, id: Uuid) -> Result<Option<RoleRow>> {
        match self {
            Self::Postgres(db) => db.get_role(id).await,
            Self::InMemory(store) => store.get_role(id),
        }
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<RoleRow>> {
        match self {
            Self::Postgres(db) => db.get_role_by_name(name).await,
            Self::InMemory(store) => store.get_role_by_name(name),
        }
    }

    pub async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<RoleRow>> {
        match self {
            Self::Postgres(db) => db.list_roles(skip, limit).await,
            Self::InMemory(store) => store.list_roles(skip, limit),
        }
    }

    // ============================================
    // Employees
    // ============================================

    pub async fn create_employee(&self, input: CreateEmployee) -> Result<EmployeeRow> {
        match self {
            Self::Postgres(db) => db.create_employee(input).await,
            Self::InMemory(store) => store.create_employee(input),
        }
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>> {
        match self {
            Self::Postgres(db) => db.get_employee(id).await,
            Self::InMemory(store) => store.get_employee(id),
        }
    }

    pub async fn get_employee_by_user(&self, user_id: Uuid) -> Result<Option<EmployeeRow>> {
        match self {
            Self::Postgres(db) => db.get_employee_by_user(user_id).await,
            Self::InMemory(store) => store.get_employee_by_user(user_id),
        }
    }

    pub async fn list_employees(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRow>> {
        match self {
            Self::Postgres(db) => db.list_employees(skip, limit).await,
            Self::InMemory(store) => store.list_employees(skip, limit),
        }
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        input: UpdateEmployee,
    ) -> Result<Option<EmployeeRow>> {
        match self {
            Self::Postgres(db) => db.update_employee(id, input).await,
            Self::InMemory(store) => store.update_employee(id, input),
        }
    }

    pub async fn list_managers_for_employee(&self, employee_id: Uuid) -> Result<Vec<UserRow>> {
        match self {
            Self::Postgres(db) => db.list_managers_for_employee(employee_id).await,
            Self::InMemory(store) => store.list_managers_for_employee(employee_id),
        }
    }

    // ============================================
    // Experiences
    // ============================================

    pub async fn create_experience(&self, input: CreateExperience) -> Result<ExperienceRow> {
        match self {
            Self::Postgres(db) => db.create_experience(input).await,
            Self::InMemory(store) => store.create_experience(input),
        }
    }

    pub async fn get_experience(&self, id: Uuid) -> Result<Option<ExperienceRow>> {
        match self {
            Self::Postgres(db) => db.get_experience(id).await,
            Self::InMemory(store) => store.get_experience(id),
        }
    }

    pub async fn list_experiences_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<ExperienceRow>> {
        match self {
            Self::Postgres(db) => db.list_experiences_for_employee(employee_id).await,
            Self::InMemory(store) => store.list_experiences_for_employee(employee_id),
        }
    }

    pub async fn update_experience(
        &self,
        id: Uuid,
        input: UpdateExperience,
    ) -> Result<Option<ExperienceRow>> {
        match self {
            Self::Postgres(db) => db.update_experience(id, input).await,
            Self::InMemory(store) => store.update_experience(id, input),
        }
    }

    pub async fn delete_experience(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_experience(id).await,
            Self::InMemory(store) => store.delete_experience(id),
        }
    }

    // ============================================
    // Experience projects
    // ============================================

    pub async fn create_experience_project(
        &self,
        input: CreateExperienceProject,
    ) -> Result<ExperienceProjectRow> {
        match self {
            Self::Postgres(db) => db.create_experience_project(input).await,
            Self::InMemory(store) => store.create_experience_project(input),
        }
    }

    pub async fn list_projects_for_experience(
        &self,
        experience_id: Uuid,
    ) -> Result<Vec<ExperienceProjectRow>> {
        match self {
            Self::Postgres(db) => db.list_projects_for_experience(experience_id).await,
            Self::InMemory(store) => store.list_projects_for_experience(experience_id),
        }
    }

    pub async fn get_project_tags(&self, project_id: Uuid) -> Result<ProjectTags> {
        match self {
            Self::Postgres(db) => db.get_project_tags(project_id).await,
            Self::InMemory(store) => store.get_project_tags(project_id),
        }
    }

    // ============================================
    // Educations
    // ============================================

    pub async fn create_education(&self, input: CreateEducation) -> Result<EducationRow> {
        match self {
            Self::Postgres(db) => db.create_education(input).await,
            Self::InMemory(store) => store.create_education(input),
        }
    }

    pub async fn get_education(&self, id: Uuid) -> Result<Option<EducationRow>> {
        match self {
            Self::Postgres(db) => db.get_education(id).await,
            Self::InMemory(store) => store.get_education(id),
        }
    }

    pub async fn list_educations_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<EducationRow>> {
        match self {
            Self::Postgres(db) => db.list_educations_for_employee(employee_id).await,
            Self::InMemory(store) => store.list_educations_for_employee(employee_id),
        }
    }

    pub async fn update_education(
        &self,
        id: Uuid,
        input: UpdateEducation,
    ) -> Result<Option<EducationRow>> {
        match self {
            Self::Postgres(db) => db.update_education(id, input).await,
            Self::InMemory(store) => store.update_education(id, input),
        }
    }

    pub async fn delete_education(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_education(id).await,
            Self::InMemory(store) => store.delete_education(id),
        }
    }

    // ============================================
    // Licenses
    // ============================================

    pub async fn create_license(&self, input: CreateLicense) -> Result<LicenseRow> {
        match self {
            Self::Postgres(db) => db.create_license(input).await,
            Self::InMemory(store) => store.create_license(input),
        }
    }

    pub async fn get_license(&self, id: Uuid) -> Result<Option<LicenseRow>> {
        match self {
            Self::Postgres(db) => db.get_license(id).await,
            Self::InMemory(store) => store.get_license(id),
        }
    }

    pub async fn list_licenses_for_employee(&self, employee_id: Uuid) -> Result<Vec<LicenseRow>> {
        match self {
            Self::Postgres(db) => db.list_licenses_for_employee(employee_id).await,
            Self::InMemory(store) => store.list_licenses_for_employee(employee_id),
        }
    }

    pub async fn update_license(&self, id: Uuid, input: UpdateLicense) -> Result<Option<LicenseRow>> {
        match self {
            Self::Postgres(db) => db.update_license(id, input).await,
            Self::InMemory(store) => store.update_license(id, input),
        }
    }

    pub async fn delete_license(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_license(id).await,
            Self::InMemory(store) => store.delete_license(id),
        }
    }
}
