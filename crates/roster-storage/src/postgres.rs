// Postgres repositories backed by sqlx
// Multi-row writes (user roles, employee managers, project tags) run in a
// single transaction so partial writes never become visible.

use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        tracing::debug!("Running database migrations");
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, badge_number, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, badge_number, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.badge_number)
        .bind(&input.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        for role_id in &input.role_ids {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, badge_number, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, badge_number, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_badge_number(&self, badge_number: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, badge_number, password_hash, created_at, updated_at
            FROM users
            WHERE badge_number = $1
            "#,
        )
        .bind(badge_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, badge_number, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at, id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_roles_for_user(&self, user_id: Uuid) -> Result<Vec<RoleRow>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.created_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Roles
    // ============================================

    pub async fn create_role(&self, input: CreateRole) -> Result<RoleRow> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_role(&self, id: Uuid) -> Result<Option<RoleRow>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<RoleRow>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<RoleRow>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, created_at
            FROM roles
            ORDER BY created_at, id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Employees
    // ============================================

    pub async fn create_employee(&self, input: CreateEmployee) -> Result<EmployeeRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (id, user_id, avatar_url, phone, job_position, department, work_location, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, avatar_url, phone, job_position, department, work_location, summary, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.avatar_url)
        .bind(&input.phone)
        .bind(&input.job_position)
        .bind(&input.department)
        .bind(&input.work_location)
        .bind(&input.summary)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_managers(&mut tx, row.id, &input.manager_ids).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, user_id, avatar_url, phone, job_position, department, work_location, summary, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_employee_by_user(&self, user_id: Uuid) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, user_id, avatar_url, phone, job_position, department, work_location, summary, created_at, updated_at
            FROM employees
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_employees(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRow>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, user_id, avatar_url, phone, job_position, department, work_location, summary, created_at, updated_at
            FROM employees
            ORDER BY created_at, id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        input: UpdateEmployee,
    ) -> Result<Option<EmployeeRow>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET
                avatar_url = COALESCE($2, avatar_url),
                phone = COALESCE($3, phone),
                job_position = COALESCE($4, job_position),
                department = COALESCE($5, department),
                work_location = COALESCE($6, work_location),
                summary = COALESCE($7, summary),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, avatar_url, phone, job_position, department, work_location, summary, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.avatar_url)
        .bind(&input.phone)
        .bind(&input.job_position)
        .bind(&input.department)
        .bind(&input.work_location)
        .bind(&input.summary)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if let Some(manager_ids) = &input.manager_ids {
            sqlx::query("DELETE FROM employee_managers WHERE employee_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::replace_managers(&mut tx, id, manager_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(row))
    }

    pub async fn list_managers_for_employee(&self, employee_id: Uuid) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.name, u.badge_number, u.password_hash, u.created_at, u.updated_at
            FROM users u
            JOIN employee_managers em ON em.manager_id = u.id
            WHERE em.employee_id = $1
            ORDER BY u.created_at, u.id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn replace_managers(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: Uuid,
        manager_ids: &[Uuid],
    ) -> Result<()> {
        for manager_id in manager_ids {
            sqlx::query(
                "INSERT INTO employee_managers (employee_id, manager_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(employee_id)
            .bind(manager_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    // ============================================
    // Experiences
    // ============================================

    pub async fn create_experience(&self, input: CreateExperience) -> Result<ExperienceRow> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            INSERT INTO experiences (id, employee_id, company_name, position, start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, employee_id, company_name, position, start_date, end_date, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.employee_id)
        .bind(&input.company_name)
        .bind(&input.position)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_experience(&self, id: Uuid) -> Result<Option<ExperienceRow>> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, employee_id, company_name, position, start_date, end_date, description, created_at, updated_at
            FROM experiences
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_experiences_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<ExperienceRow>> {
        let rows = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, employee_id, company_name, position, start_date, end_date, description, created_at, updated_at
            FROM experiences
            WHERE employee_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_experience(
        &self,
        id: Uuid,
        input: UpdateExperience,
    ) -> Result<Option<ExperienceRow>> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            UPDATE experiences
            SET
                company_name = COALESCE($2, company_name),
                position = COALESCE($3, position),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                description = COALESCE($6, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_id, company_name, position, start_date, end_date, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.company_name)
        .bind(&input.position)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_experience(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Experience projects and tag catalogs
    // ============================================

    pub async fn create_experience_project(
        &self,
        input: CreateExperienceProject,
    ) -> Result<ExperienceProjectRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ExperienceProjectRow>(
            r#"
            INSERT INTO experience_projects (id, experience_id, name, overview, team_size, website, position, responsibility)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, experience_id, name, overview, team_size, website, position, responsibility, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.experience_id)
        .bind(&input.name)
        .bind(&input.overview)
        .bind(input.team_size)
        .bind(&input.website)
        .bind(&input.position)
        .bind(&input.responsibility)
        .fetch_one(&mut *tx)
        .await?;

        for name in &input.programming_languages {
            let tag_id = Self::find_or_create_tag(&mut tx, "programming_languages", name).await?;
            sqlx::query(
                "INSERT INTO project_programming_languages (project_id, language_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }
        for name in &input.frameworks {
            let tag_id = Self::find_or_create_tag(&mut tx, "frameworks", name).await?;
            sqlx::query(
                "INSERT INTO project_frameworks (project_id, framework_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }
        for name in &input.servers {
            let tag_id = Self::find_or_create_tag(&mut tx, "servers", name).await?;
            sqlx::query(
                "INSERT INTO project_servers (project_id, server_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    pub async fn list_projects_for_experience(
        &self,
        experience_id: Uuid,
    ) -> Result<Vec<ExperienceProjectRow>> {
        let rows = sqlx::query_as::<_, ExperienceProjectRow>(
            r#"
            SELECT id, experience_id, name, overview, team_size, website, position, responsibility, created_at, updated_at
            FROM experience_projects
            WHERE experience_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(experience_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_project_tags(&self, project_id: Uuid) -> Result<ProjectTags> {
        let programming_languages = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM programming_languages t
            JOIN project_programming_languages j ON j.language_id = t.id
            WHERE j.project_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let frameworks = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM frameworks t
            JOIN project_frameworks j ON j.framework_id = t.id
            WHERE j.project_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let servers = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM servers t
            JOIN project_servers j ON j.server_id = t.id
            WHERE j.project_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProjectTags {
            programming_languages,
            frameworks,
            servers,
        })
    }

    // Tag catalogs share the same (id, name UNIQUE) shape. The DO UPDATE
    // no-op makes RETURNING yield the existing id on conflict.
    async fn find_or_create_tag(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        name: &str,
    ) -> Result<Uuid> {
        let sql = format!(
            "INSERT INTO {table} (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id"
        );
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(Uuid::now_v7())
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    // ============================================
    // Educations
    // ============================================

    pub async fn create_education(&self, input: CreateEducation) -> Result<EducationRow> {
        let row = sqlx::query_as::<_, EducationRow>(
            r#"
            INSERT INTO educations (id, employee_id, institute_name, degree, start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, employee_id, institute_name, degree, start_date, end_date, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.employee_id)
        .bind(&input.institute_name)
        .bind(&input.degree)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_education(&self, id: Uuid) -> Result<Option<EducationRow>> {
        let row = sqlx::query_as::<_, EducationRow>(
            r#"
            SELECT id, employee_id, institute_name, degree, start_date, end_date, description, created_at, updated_at
            FROM educations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_educations_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<EducationRow>> {
        let rows = sqlx::query_as::<_, EducationRow>(
            r#"
            SELECT id, employee_id, institute_name, degree, start_date, end_date, description, created_at, updated_at
            FROM educations
            WHERE employee_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_education(
        &self,
        id: Uuid,
        input: UpdateEducation,
    ) -> Result<Option<EducationRow>> {
        let row = sqlx::query_as::<_, EducationRow>(
            r#"
            UPDATE educations
            SET
                institute_name = COALESCE($2, institute_name),
                degree = COALESCE($3, degree),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                description = COALESCE($6, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_id, institute_name, degree, start_date, end_date, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.institute_name)
        .bind(&input.degree)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_education(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM educations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Licenses
    // ============================================

    pub async fn create_license(&self, input: CreateLicense) -> Result<LicenseRow> {
        let row = sqlx::query_as::<_, LicenseRow>(
            r#"
            INSERT INTO licenses (id, employee_id, license_name, issuing_organization, credential_id, start_date, end_date, credential_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, employee_id, license_name, issuing_organization, credential_id, start_date, end_date, credential_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.employee_id)
        .bind(&input.license_name)
        .bind(&input.issuing_organization)
        .bind(&input.credential_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.credential_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_license(&self, id: Uuid) -> Result<Option<LicenseRow>> {
        let row = sqlx::query_as::<_, LicenseRow>(
            r#"
            SELECT id, employee_id, license_name, issuing_organization, credential_id, start_date, end_date, credential_url, created_at, updated_at
            FROM licenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_licenses_for_employee(&self, employee_id: Uuid) -> Result<Vec<LicenseRow>> {
        let rows = sqlx::query_as::<_, LicenseRow>(
            r#"
            SELECT id, employee_id, license_name, issuing_organization, credential_id, start_date, end_date, credential_url, created_at, updated_at
            FROM licenses
            WHERE employee_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_license(&self, id: Uuid, input: UpdateLicense) -> Result<Option<LicenseRow>> {
        let row = sqlx::query_as::<_, LicenseRow>(
            r#"
            UPDATE licenses
            SET
                license_name = COALESCE($2, license_name),
                issuing_organization = COALESCE($3, issuing_organization),
                credential_id = COALESCE($4, credential_id),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                credential_url = COALESCE($7, credential_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_id, license_name, issuing_organization, credential_id, start_date, end_date, credential_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.license_name)
        .bind(&input.issuing_organization)
        .bind(&input.credential_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.credential_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_license(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM licenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
