// Employee profile service

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use roster_storage::{CreateEmployee, Database, EmployeeRow, UpdateEmployee};
use uuid::Uuid;

use super::user::assemble_user;

pub struct EmployeeService {
    db: Arc<Database>,
}

impl EmployeeService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a profile owned by `user_id`. Manager IDs are validated by
    /// the handler before this runs.
    pub async fn create(&self, user_id: Uuid, req: CreateEmployeeRequest) -> Result<Employee> {
        let row = self
            .db
            .create_employee(CreateEmployee {
                user_id,
                avatar_url: req.avatar_url,
                phone: req.phone,
                job_position: req.job_position,
                department: req.department,
                work_location: req.work_location,
                summary: req.summary,
                manager_ids: req.managers,
            })
            .await?;
        self.assemble(row).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
        match self.db.get_employee(id).await? {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Option<Employee>> {
        match self.db.get_employee_by_user(user_id).await? {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Employee>> {
        let rows = self.db.list_employees(skip, limit).await?;
        let mut employees = Vec::with_capacity(rows.len());
        for row in rows {
            employees.push(self.assemble(row).await?);
        }
        Ok(employees)
    }

    pub async fn update(&self, id: Uuid, req: UpdateEmployeeRequest) -> Result<Option<Employee>> {
        let row = self
            .db
            .update_employee(
                id,
                UpdateEmployee {
                    avatar_url: req.avatar_url,
                    phone: req.phone,
                    job_position: req.job_position,
                    department: req.department,
                    work_location: req.work_location,
                    summary: req.summary,
                    manager_ids: req.managers,
                },
            )
            .await?;
        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn assemble(&self, row: EmployeeRow) -> Result<Employee> {
        let manager_rows = self.db.list_managers_for_employee(row.id).await?;
        let mut managers = Vec::with_capacity(manager_rows.len());
        for manager in manager_rows {
            managers.push(assemble_user(&self.db, manager).await?);
        }

        Ok(Employee {
            id: row.id,
            user_id: row.user_id,
            avatar_url: row.avatar_url,
            phone: row.phone,
            job_position: row.job_position,
            department: row.department,
            work_location: row.work_location,
            summary: row.summary,
            managers,
        })
    }
}
