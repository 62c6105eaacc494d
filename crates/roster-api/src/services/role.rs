// Role catalog service

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{CreateRoleRequest, Role};
use roster_storage::{CreateRole, Database, RoleRow};
use uuid::Uuid;

pub struct RoleService {
    db: Arc<Database>,
}

impl RoleService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateRoleRequest) -> Result<Role> {
        let row = self.db.create_role(CreateRole { name: req.name }).await?;
        Ok(row_to_role(row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Role>> {
        Ok(self.db.get_role(id).await?.map(row_to_role))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.db.get_role_by_name(name).await?.map(row_to_role))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Role>> {
        let rows = self.db.list_roles(skip, limit).await?;
        Ok(rows.into_iter().map(row_to_role).collect())
    }
}

pub(crate) fn row_to_role(row: RoleRow) -> Role {
    Role {
        id: row.id,
        name: row.name,
    }
}
