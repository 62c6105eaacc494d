// Professional license service

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{CreateLicenseRequest, License, UpdateLicenseRequest};
use roster_storage::{CreateLicense, Database, LicenseRow, UpdateLicense};
use uuid::Uuid;

pub struct LicenseService {
    db: Arc<Database>,
}

impl LicenseService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, employee_id: Uuid, req: CreateLicenseRequest) -> Result<License> {
        let row = self
            .db
            .create_license(CreateLicense {
                employee_id,
                license_name: req.license_name,
                issuing_organization: req.issuing_organization,
                credential_id: req.credential_id,
                start_date: req.start_date,
                end_date: req.end_date,
                credential_url: req.credential_url,
            })
            .await?;
        Ok(row_to_license(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<License>> {
        Ok(self.db.get_license(id).await?.map(row_to_license))
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<License>> {
        let rows = self.db.list_licenses_for_employee(employee_id).await?;
        Ok(rows.into_iter().map(row_to_license).collect())
    }

    pub async fn update(&self, id: Uuid, req: UpdateLicenseRequest) -> Result<Option<License>> {
        let row = self
            .db
            .update_license(
                id,
                UpdateLicense {
                    license_name: req.license_name,
                    issuing_organization: req.issuing_organization,
                    credential_id: req.credential_id,
                    start_date: req.start_date,
                    end_date: req.end_date,
                    credential_url: req.credential_url,
                },
            )
            .await?;
        Ok(row.map(row_to_license))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_license(id).await
    }
}

fn row_to_license(row: LicenseRow) -> License {
    License {
        id: row.id,
        employee_id: row.employee_id,
        license_name: row.license_name,
        issuing_organization: row.issuing_organization,
        credential_id: row.credential_id,
        start_date: row.start_date,
        end_date: row.end_date,
        credential_url: row.credential_url,
    }
}
