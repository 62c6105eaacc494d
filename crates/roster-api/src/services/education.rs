// Education history service

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{CreateEducationRequest, Education, UpdateEducationRequest};
use roster_storage::{CreateEducation, Database, EducationRow, UpdateEducation};
use uuid::Uuid;

pub struct EducationService {
    db: Arc<Database>,
}

impl EducationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, employee_id: Uuid, req: CreateEducationRequest) -> Result<Education> {
        let row = self
            .db
            .create_education(CreateEducation {
                employee_id,
                institute_name: req.institute_name,
                degree: req.degree,
                start_date: req.start_date,
                end_date: req.end_date,
                description: req.description,
            })
            .await?;
        Ok(row_to_education(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Education>> {
        Ok(self.db.get_education(id).await?.map(row_to_education))
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<Education>> {
        let rows = self.db.list_educations_for_employee(employee_id).await?;
        Ok(rows.into_iter().map(row_to_education).collect())
    }

    pub async fn update(&self, id: Uuid, req: UpdateEducationRequest) -> Result<Option<Education>> {
        let row = self
            .db
            .update_education(
                id,
                UpdateEducation {
                    institute_name: req.institute_name,
                    degree: req.degree,
                    start_date: req.start_date,
                    end_date: req.end_date,
                    description: req.description,
                },
            )
            .await?;
        Ok(row.map(row_to_education))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_education(id).await
    }
}

fn row_to_education(row: EducationRow) -> Education {
    Education {
        id: row.id,
        employee_id: row.employee_id,
        institute_name: row.institute_name,
        degree: row.degree,
        start_date: row.start_date,
        end_date: row.end_date,
        description: row.description,
    }
}
