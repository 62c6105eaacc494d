//! In-memory storage for tests and local development.
//!
//! Keeps every table in a `RwLock<HashMap>` and mirrors the ordering and
//! join semantics of the Postgres queries, so callers observe the same
//! behavior regardless of backend.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::*;

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, UserRow>>,
    roles: RwLock<HashMap<Uuid, RoleRow>>,
    user_roles: RwLock<Vec<(Uuid, Uuid)>>,
    employees: RwLock<HashMap<Uuid, EmployeeRow>>,
    employee_managers: RwLock<Vec<(Uuid, Uuid)>>,
    experiences: RwLock<HashMap<Uuid, ExperienceRow>>,
    projects: RwLock<HashMap<Uuid, ExperienceProjectRow>>,
    project_tags: RwLock<HashMap<Uuid, ProjectTags>>,
    educations: RwLock<HashMap<Uuid, EducationRow>>,
    licenses: RwLock<HashMap<Uuid, LicenseRow>>,
}

fn paginate<T>(mut rows: Vec<T>, skip: i64, limit: i64) -> Vec<T>
where
    T: Clone,
{
    let skip = skip.max(0) as usize;
    let limit = limit.max(0) as usize;
    if skip >= rows.len() {
        return Vec::new();
    }
    rows.drain(..skip);
    rows.truncate(limit);
    rows
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Users
    // ============================================

    pub fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            badge_number: input.badge_number,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.write().insert(row.id, row.clone());

        let mut pairs = self.user_roles.write();
        for role_id in input.role_ids {
            if !pairs.contains(&(row.id, role_id)) {
                pairs.push((row.id, role_id));
            }
        }

        Ok(row)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub fn get_user_by_badge_number(&self, badge_number: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.badge_number == badge_number)
            .cloned())
    }

    pub fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<UserRow>> {
        let mut rows: Vec<UserRow> = self.users.read().values().cloned().collect();
        rows.sort_by_key(|u| (u.created_at, u.id));
        Ok(paginate(rows, skip, limit))
    }

    pub fn list_roles_for_user(&self, user_id: Uuid) -> Result<Vec<RoleRow>> {
        let pairs = self.user_roles.read();
        let roles = self.roles.read();
        let mut rows: Vec<RoleRow> = pairs
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, rid)| roles.get(rid).cloned())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    // ============================================
    // Roles
    // ============================================

    pub fn create_role(&self, input: CreateRole) -> Result<RoleRow> {
        let row = RoleRow {
            id: Uuid::now_v7(),
            name: input.name,
            created_at: Utc::now(),
        };
        self.roles.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub fn get_role(&self, id: Uuid) -> Result<Option<RoleRow>> {
        Ok(self.roles.read().get(&id).cloned())
    }

    pub fn get_role_by_name(&self, name: &str) -> Result<Option<RoleRow>> {
        Ok(self.roles.read().values().find(|r| r.name == name).cloned())
    }

    pub fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<RoleRow>> {
        let mut rows: Vec<RoleRow> = self.roles.read().values().cloned().collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        Ok(paginate(rows, skip, limit))
    }

    // ============================================
    // Employees
    // ============================================

    pub fn create_employee(&self, input: CreateEmployee) -> Result<EmployeeRow> {
        let now = Utc::now();
        let row = EmployeeRow {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            avatar_url: input.avatar_url,
            phone: input.phone,
            job_position: input.job_position,
            department: input.department,
            work_location: input.work_location,
            summary: input.summary,
            created_at: now,
            updated_at: now,
        };
        self.employees.write().insert(row.id, row.clone());

        let mut pairs = self.employee_managers.write();
        for manager_id in input.manager_ids {
            if !pairs.contains(&(row.id, manager_id)) {
                pairs.push((row.id, manager_id));
            }
        }

        Ok(row)
    }

    pub fn get_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>> {
        Ok(self.employees.read().get(&id).cloned())
    }

    pub fn get_employee_by_user(&self, user_id: Uuid) -> Result<Option<EmployeeRow>> {
        Ok(self
            .employees
            .read()
            .values()
            .find(|e| e.user_id == user_id)
            .cloned())
    }

    pub fn list_employees(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRow>> {
        let mut rows: Vec<EmployeeRow> = self.employees.read().values().cloned().collect();
        rows.sort_by_key(|e| (e.created_at, e.id));
        Ok(paginate(rows, skip, limit))
    }

    pub fn update_employee(&self, id: Uuid, input: UpdateEmployee) -> Result<Option<EmployeeRow>> {
        let mut employees = self.employees.write();
        let Some(row) = employees.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(avatar_url) = input.avatar_url {
            row.avatar_url = Some(avatar_url);
        }
        if let Some(phone) = input.phone {
            row.phone = Some(phone);
        }
        if let Some(job_position) = input.job_position {
            row.job_position = Some(job_position);
        }
        if let Some(department) = input.department {
            row.department = Some(department);
        }
        if let Some(work_location) = input.work_location {
            row.work_location = Some(work_location);
        }
        if let Some(summary) = input.summary {
            row.summary = Some(summary);
        }
        row.updated_at = Utc::now();
        let row = row.clone();
        drop(employees);

        if let Some(manager_ids) = input.manager_ids {
            let mut pairs = self.employee_managers.write();
            pairs.retain(|(eid, _)| *eid != id);
            for manager_id in manager_ids {
                if !pairs.contains(&(id, manager_id)) {
                    pairs.push((id, manager_id));
                }
            }
        }

        Ok(Some(row))
    }

    pub fn list_managers_for_employee(&self, employee_id: Uuid) -> Result<Vec<UserRow>> {
        let pairs = self.employee_managers.read();
        let users = self.users.read();
        let mut rows: Vec<UserRow> = pairs
            .iter()
            .filter(|(eid, _)| *eid == employee_id)
            .filter_map(|(_, mid)| users.get(mid).cloned())
            .collect();
        rows.sort_by_key(|u| (u.created_at, u.id));
        Ok(rows)
    }

    // ============================================
    // Experiences
    // ============================================

    pub fn create_experience(&self, input: CreateExperience) -> Result<ExperienceRow> {
        let now = Utc::now();
        let row = ExperienceRow {
            id: Uuid::now_v7(),
            employee_id: input.employee_id,
            company_name: input.company_name,
            position: input.position,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        self.experiences.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub fn get_experience(&self, id: Uuid) -> Result<Option<ExperienceRow>> {
        Ok(self.experiences.read().get(&id).cloned())
    }

    pub fn list_experiences_for_employee(&self, employee_id: Uuid) -> Result<Vec<ExperienceRow>> {
        let mut rows: Vec<ExperienceRow> = self
            .experiences
            .read()
            .values()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.created_at, e.id));
        Ok(rows)
    }

    pub fn update_experience(
        &self,
        id: Uuid,
        input: UpdateExperience,
    ) -> Result<Option<ExperienceRow>> {
        let mut experiences = self.experiences.write();
        let Some(row) = experiences.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(company_name) = input.company_name {
            row.company_name = company_name;
        }
        if let Some(position) = input.position {
            row.position = Some(position);
        }
        if let Some(start_date) = input.start_date {
            row.start_date = Some(start_date);
        }
        if let Some(end_date) = input.end_date {
            row.end_date = Some(end_date);
        }
        if let Some(description) = input.description {
            row.description = Some(description);
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    pub fn delete_experience(&self, id: Uuid) -> Result<bool> {
        let removed = self.experiences.write().remove(&id).is_some();
        if removed {
            // Cascade like the foreign keys do.
            let project_ids: Vec<Uuid> = self
                .projects
                .read()
                .values()
                .filter(|p| p.experience_id == id)
                .map(|p| p.id)
                .collect();
            let mut projects = self.projects.write();
            let mut tags = self.project_tags.write();
            for project_id in project_ids {
                projects.remove(&project_id);
                tags.remove(&project_id);
            }
        }
        Ok(removed)
    }

    // ============================================
    // Experience projects and tag catalogs
    // ============================================

    pub fn create_experience_project(
        &self,
        input: CreateExperienceProject,
    ) -> Result<ExperienceProjectRow> {
        let now = Utc::now();
        let row = ExperienceProjectRow {
            id: Uuid::now_v7(),
            experience_id: input.experience_id,
            name: input.name,
            overview: input.overview,
            team_size: input.team_size,
            website: input.website,
            position: input.position,
            responsibility: input.responsibility,
            created_at: now,
            updated_at: now,
        };
        self.projects.write().insert(row.id, row.clone());

        let mut tags = ProjectTags {
            programming_languages: input.programming_languages,
            frameworks: input.frameworks,
            servers: input.servers,
        };
        for list in [
            &mut tags.programming_languages,
            &mut tags.frameworks,
            &mut tags.servers,
        ] {
            list.sort();
            list.dedup();
        }
        self.project_tags.write().insert(row.id, tags);

        Ok(row)
    }

    pub fn list_projects_for_experience(
        &self,
        experience_id: Uuid,
    ) -> Result<Vec<ExperienceProjectRow>> {
        let mut rows: Vec<ExperienceProjectRow> = self
            .projects
            .read()
            .values()
            .filter(|p| p.experience_id == experience_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| (p.created_at, p.id));
        Ok(rows)
    }

    pub fn get_project_tags(&self, project_id: Uuid) -> Result<ProjectTags> {
        Ok(self
            .project_tags
            .read()
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }

    // ============================================
    // Educations
    // ============================================

    pub fn create_education(&self, input: CreateEducation) -> Result<EducationRow> {
        let now = Utc::now();
        let row = EducationRow {
            id: Uuid::now_v7(),
            employee_id: input.employee_id,
            institute_name: input.institute_name,
            degree: input.degree,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        self.educations.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub fn get_education(&self, id: Uuid) -> Result<Option<EducationRow>> {
        Ok(self.educations.read().get(&id).cloned())
    }

    pub fn list_educations_for_employee(&self, employee_id: Uuid) -> Result<Vec<EducationRow>> {
        let mut rows: Vec<EducationRow> = self
            .educations
            .read()
            .values()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.created_at, e.id));
        Ok(rows)
    }

    pub fn update_education(
        &self,
        id: Uuid,
        input: UpdateEducation,
    ) -> Result<Option<EducationRow>> {
        let mut educations = self.educations.write();
        let Some(row) = educations.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(institute_name) = input.institute_name {
            row.institute_name = institute_name;
        }
        if let Some(degree) = input.degree {
            row.degree = Some(degree);
        }
        if let Some(start_date) = input.start_date {
            row.start_date = Some(start_date);
        }
        if let Some(end_date) = input.end_date {
            row.end_date = Some(end_date);
        }
        if let Some(description) = input.description {
            row.description = Some(description);
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    pub fn delete_education(&self, id: Uuid) -> Result<bool> {
        Ok(self.educations.write().remove(&id).is_some())
    }

    // ============================================
    // Licenses
    // ============================================

    pub fn create_license(&self, input: CreateLicense) -> Result<LicenseRow> {
        let now = Utc::now();
        let row = LicenseRow {
            id: Uuid::now_v7(),
            employee_id: input.employee_id,
            license_name: input.license_name,
            issuing_organization: input.issuing_organization,
            credential_id: input.credential_id,
            start_date: input.start_date,
            end_date: input.end_date,
            credential_url: input.credential_url,
            created_at: now,
            updated_at: now,
        };
        self.licenses.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub fn get_license(&self, id: Uuid) -> Result<Option<LicenseRow>> {
        Ok(self.licenses.read().get(&id).cloned())
    }

    pub fn list_licenses_for_employee(&self, employee_id: Uuid) -> Result<Vec<LicenseRow>> {
        let mut rows: Vec<LicenseRow> = self
            .licenses
            .read()
            .values()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by_key(|l| (l.created_at, l.id));
        Ok(rows)
    }

    pub fn update_license(&self, id: Uuid, input: UpdateLicense) -> Result<Option<LicenseRow>> {
        let mut licenses = self.licenses.write();
        let Some(row) = licenses.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(license_name) = input.license_name {
            row.license_name = license_name;
        }
        if let Some(issuing_organization) = input.issuing_organization {
            row.issuing_organization = Some(issuing_organization);
        }
        if let Some(credential_id) = input.credential_id {
            row.credential_id = Some(credential_id);
        }
        if let Some(start_date) = input.start_date {
            row.start_date = Some(start_date);
        }
        if let Some(end_date) = input.end_date {
            row.end_date = Some(end_date);
        }
        if let Some(credential_url) = input.credential_url {
            row.credential_url = Some(credential_url);
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    pub fn delete_license(&self, id: Uuid) -> Result<bool> {
        Ok(self.licenses.write().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str, badge: &str) -> CreateUser {
        CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            badge_number: badge.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role_ids: vec![],
        }
    }

    #[test]
    fn user_lookup_by_email_and_badge() {
        let store = InMemoryStore::new();
        let created = store.create_user(sample_user("ada@example.com", "E-100")).unwrap();

        let by_email = store.get_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_badge = store.get_user_by_badge_number("E-100").unwrap().unwrap();
        assert_eq!(by_badge.id, created.id);

        assert!(store.get_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn user_roles_are_attached_and_sorted_by_name() {
        let store = InMemoryStore::new();
        let admin = store
            .create_role(CreateRole { name: "admin".to_string() })
            .unwrap();
        let viewer = store
            .create_role(CreateRole { name: "viewer".to_string() })
            .unwrap();

        let mut input = sample_user("bob@example.com", "E-101");
        input.role_ids = vec![viewer.id, admin.id, admin.id];
        let user = store.create_user(input).unwrap();

        let roles = store.list_roles_for_user(user.id).unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["admin", "viewer"]);
    }

    #[test]
    fn list_users_paginates_in_creation_order() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .create_user(sample_user(&format!("u{i}@example.com"), &format!("E-{i}")))
                .unwrap();
        }

        let page = store.list_users(1, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].email, "u1@example.com");
        assert_eq!(page[1].email, "u2@example.com");

        assert!(store.list_users(10, 2).unwrap().is_empty());
    }

    #[test]
    fn update_employee_replaces_managers_only_when_given() {
        let store = InMemoryStore::new();
        let boss = store.create_user(sample_user("boss@example.com", "E-1")).unwrap();
        let other = store.create_user(sample_user("other@example.com", "E-2")).unwrap();
        let worker = store.create_user(sample_user("worker@example.com", "E-3")).unwrap();

        let employee = store
            .create_employee(CreateEmployee {
                user_id: worker.id,
                manager_ids: vec![boss.id],
                ..Default::default()
            })
            .unwrap();

        // Field-only update leaves managers alone.
        store
            .update_employee(
                employee.id,
                UpdateEmployee {
                    phone: Some("555-0101".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        let managers = store.list_managers_for_employee(employee.id).unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].id, boss.id);

        // Explicit manager list replaces the previous set.
        store
            .update_employee(
                employee.id,
                UpdateEmployee {
                    manager_ids: Some(vec![other.id]),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        let managers = store.list_managers_for_employee(employee.id).unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].id, other.id);
    }

    #[test]
    fn delete_experience_cascades_to_projects() {
        let store = InMemoryStore::new();
        let user = store.create_user(sample_user("dev@example.com", "E-9")).unwrap();
        let employee = store
            .create_employee(CreateEmployee {
                user_id: user.id,
                ..Default::default()
            })
            .unwrap();
        let experience = store
            .create_experience(CreateExperience {
                employee_id: employee.id,
                company_name: "Initech".to_string(),
                position: None,
                start_date: None,
                end_date: None,
                description: None,
            })
            .unwrap();
        let project = store
            .create_experience_project(CreateExperienceProject {
                experience_id: experience.id,
                name: "Migration".to_string(),
                overview: None,
                team_size: Some(4),
                website: None,
                position: None,
                responsibility: None,
                programming_languages: vec!["Rust".to_string(), "Rust".to_string()],
                frameworks: vec![],
                servers: vec![],
            })
            .unwrap();

        // Duplicate tag names collapse, mirroring the unique catalogs.
        let tags = store.get_project_tags(project.id).unwrap();
        assert_eq!(tags.programming_languages, ["Rust"]);

        assert!(store.delete_experience(experience.id).unwrap());
        assert!(store.list_projects_for_experience(experience.id).unwrap().is_empty());
        assert!(store.get_project_tags(project.id).unwrap().programming_languages.is_empty());
        assert!(!store.delete_experience(experience.id).unwrap());
    }

    #[test]
    fn partial_updates_keep_existing_fields() {
        let store = InMemoryStore::new();
        let user = store.create_user(sample_user("edu@example.com", "E-8")).unwrap();
        let employee = store
            .create_employee(CreateEmployee {
                user_id: user.id,
                ..Default::default()
            })
            .unwrap();
        let education = store
            .create_education(CreateEducation {
                employee_id: employee.id,
                institute_name: "MIT".to_string(),
                degree: Some("BSc".to_string()),
                start_date: None,
                end_date: None,
                description: None,
            })
            .unwrap();

        let updated = store
            .update_education(
                education.id,
                UpdateEducation {
                    institute_name: Some("Stanford".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.institute_name, "Stanford");
        assert_eq!(updated.degree.as_deref(), Some("BSc"));
    }
}
