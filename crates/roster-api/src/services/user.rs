// User account service

use std::sync::Arc;

use anyhow::Result;
use roster_contracts::{CreateUserRequest, User};
use roster_storage::{password, CreateUser, Database, UserRow};
use uuid::Uuid;

use super::role::row_to_role;

pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register an account. The plaintext password is hashed here and
    /// never stored.
    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let password_hash = password::hash_password(&req.password)?;
        let row = self
            .db
            .create_user(CreateUser {
                name: req.name,
                email: req.email,
                badge_number: req.badge_number,
                password_hash,
                role_ids: req.roles,
            })
            .await?;
        assemble_user(&self.db, row).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        match self.db.get_user(id).await? {
            Some(row) => Ok(Some(assemble_user(&self.db, row).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let rows = self.db.list_users(skip, limit).await?;
        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(assemble_user(&self.db, row).await?);
        }
        Ok(users)
    }
}

/// Attach roles to a user row, producing the wire shape
pub(crate) async fn assemble_user(db: &Database, row: UserRow) -> Result<User> {
    let roles = db
        .list_roles_for_user(row.id)
        .await?
        .into_iter()
        .map(row_to_role)
        .collect();

    Ok(User {
        id: row.id,
        name: row.name,
        email: row.email,
        badge_number: row.badge_number,
        roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_storage::CreateRole;

    #[tokio::test]
    async fn create_hashes_password_and_attaches_roles() {
        let db = Arc::new(Database::in_memory());
        let role = db
            .create_role(CreateRole {
                name: "admin".to_string(),
            })
            .await
            .unwrap();

        let service = UserService::new(db.clone());
        let user = service
            .create(CreateUserRequest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                badge_number: "E-1".to_string(),
                password: "hunter2".to_string(),
                roles: vec![role.id],
            })
            .await
            .unwrap();

        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].name, "admin");

        let stored = db.get_user_by_email("ada@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter2");
        assert!(password::verify_password("hunter2", &stored.password_hash).unwrap());
    }
}
