// Work experience service, including per-experience projects

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{
    CreateExperienceProjectRequest, CreateExperienceRequest, Experience, ExperienceProject,
    UpdateExperienceRequest,
};
use roster_storage::{
    CreateExperience, CreateExperienceProject, Database, ExperienceProjectRow, ExperienceRow,
    UpdateExperience,
};
use uuid::Uuid;

pub struct ExperienceService {
    db: Arc<Database>,
}

impl ExperienceService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, employee_id: Uuid, req: CreateExperienceRequest) -> Result<Experience> {
        let row = self
            .db
            .create_experience(CreateExperience {
                employee_id,
                company_name: req.company_name,
                position: req.position,
                start_date: req.start_date,
                end_date: req.end_date,
                description: req.description,
            })
            .await?;
        Ok(row_to_experience(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Experience>> {
        Ok(self.db.get_experience(id).await?.map(row_to_experience))
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<Experience>> {
        let rows = self.db.list_experiences_for_employee(employee_id).await?;
        Ok(rows.into_iter().map(row_to_experience).collect())
    }

    pub async fn update(&self, id: Uuid, req: UpdateExperienceRequest) -> Result<Option<Experience>> {
        let row = self
            .db
            .update_experience(
                id,
                UpdateExperience {
                    company_name: req.company_name,
                    position: req.position,
                    start_date: req.start_date,
                    end_date: req.end_date,
                    description: req.description,
                },
            )
            .await?;
        Ok(row.map(row_to_experience))
    }

    /// Delete an experience along with its projects
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_experience(id).await
    }

    pub async fn create_project(
        &self,
        experience_id: Uuid,
        req: CreateExperienceProjectRequest,
    ) -> Result<ExperienceProject> {
        let row = self
            .db
            .create_experience_project(CreateExperienceProject {
                experience_id,
                name: req.name,
                overview: req.overview,
                team_size: req.team_size,
                website: req.website,
                position: req.position,
                responsibility: req.responsibility,
                programming_languages: req.programming_languages,
                frameworks: req.frameworks,
                servers: req.servers,
            })
            .await?;
        self.assemble_project(row).await
    }

    pub async fn list_projects(&self, experience_id: Uuid) -> Result<Vec<ExperienceProject>> {
        let rows = self.db.list_projects_for_experience(experience_id).await?;
        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            projects.push(self.assemble_project(row).await?);
        }
        Ok(projects)
    }

    async fn assemble_project(&self, row: ExperienceProjectRow) -> Result<ExperienceProject> {
        let tags = self.db.get_project_tags(row.id).await?;
        Ok(ExperienceProject {
            id: row.id,
            experience_id: row.experience_id,
            name: row.name,
            overview: row.overview,
            team_size: row.team_size,
            website: row.website,
            position: row.position,
            responsibility: row.responsibility,
            programming_languages: tags.programming_languages,
            frameworks: tags.frameworks,
            servers: tags.servers,
        })
    }
}

fn row_to_experience(row: ExperienceRow) -> Experience {
    Experience {
        id: row.id,
        employee_id: row.employee_id,
        company_name: row.company_name,
        position: row.position,
        start_date: row.start_date,
        end_date: row.end_date,
        description: row.description,
    }
}
