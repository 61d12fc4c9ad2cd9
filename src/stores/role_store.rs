use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::RoleError;
use crate::stores::is_unique_violation;
use crate::types::db::role::{self, Entity as Role};
use crate::types::db::user_role::{self, Entity as UserRole};

/// RoleStore reads the role catalogue and manages user-role assignments
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All catalogue roles, ordered by name
    pub async fn list_roles(&self) -> Result<Vec<role::Model>, InternalError> {
        Role::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_roles", e))
    }

    /// Look up a catalogue role; the name is matched case-insensitively
    pub async fn get_role(&self, role_name: &str) -> Result<role::Model, InternalError> {
        let canonical = role_name.trim().to_uppercase();

        Role::find_by_id(canonical)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_role", e))?
            .ok_or_else(|| RoleError::UnknownRole(role_name.to_string()).into())
    }

    /// Role names held by one user, sorted
    pub async fn roles_for_user(&self, user_id: &str) -> Result<Vec<String>, InternalError> {
        let assignments = UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::RoleName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("roles_for_user", e))?;

        Ok(assignments.into_iter().map(|a| a.role_name).collect())
    }

    /// Role names for many users in a single query
    ///
    /// Users without roles are absent from the map.
    pub async fn roles_for_users(&self, user_ids: &[String]) -> Result<HashMap<String, Vec<String>>, InternalError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let assignments = UserRole::find()
            .filter(user_role::Column::UserId.is_in(user_ids.iter().cloned()))
            .order_by_asc(user_role::Column::RoleName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("roles_for_users", e))?;

        let mut by_user: HashMap<String, Vec<String>> = HashMap::new();
        for assignment in assignments {
            by_user.entry(assignment.user_id).or_default().push(assignment.role_name);
        }

        Ok(by_user)
    }

    /// Assign a role to a user
    ///
    /// # Returns
    /// * `Ok(true)` - The assignment was created
    /// * `Ok(false)` - The user already held the role
    /// * `Err(InternalError)` - UnknownRole, or a database error
    pub async fn assign_role(&self, user_id: &str, role_name: &str) -> Result<bool, InternalError> {
        let role = self.get_role(role_name).await?;

        let existing = UserRole::find_by_id((user_id.to_string(), role.name.clone()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_role", e))?;
        if existing.is_some() {
            return Ok(false);
        }

        let assignment = user_role::ActiveModel {
            user_id: Set(user_id.to_string()),
            role_name: Set(role.name.clone()),
            assigned_at: Set(Utc::now().timestamp()),
        };

        match assignment.insert(&self.db).await {
            Ok(_) => {}
            // A concurrent request assigned the same role first
            Err(e) if is_unique_violation(&e) => return Ok(false),
            Err(e) => return Err(InternalError::database("assign_role", e)),
        }

        tracing::info!(user_id = %user_id, role = %role.name, "Role assigned");

        Ok(true)
    }

    /// Remove a role from a user
    ///
    /// # Returns
    /// * `Ok(true)` - The assignment existed and was removed
    /// * `Ok(false)` - The user did not hold the role
    pub async fn revoke_role(&self, user_id: &str, role_name: &str) -> Result<bool, InternalError> {
        let role = self.get_role(role_name).await?;

        let result = UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleName.eq(role.name.clone()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_role", e))?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %user_id, role = %role.name, "Role revoked");
        }

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::user_store::{NewUser, UserStore};
    use crate::test::utils::setup_test_db;

    async fn create_user(db: &DatabaseConnection, email: &str) -> String {
        UserStore::new(db.clone())
            .create_user(NewUser {
                email: email.to_string(),
                username: None,
                password_hash: "hash".to_string(),
                first_name: None,
                last_name: None,
                is_active: true,
                is_approved: true,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_catalogue_is_seeded() {
        let store = RoleStore::new(setup_test_db().await);

        let names: Vec<String> = store.list_roles().await.unwrap().into_iter().map(|r| r.name).collect();

        assert_eq!(
            names,
            vec!["ADMIN", "DOCTOR", "RADIOLOGIST", "SUPERUSER", "TECHNICIAN", "VIEWER"]
        );
    }

    #[tokio::test]
    async fn test_get_role_is_case_insensitive_and_rejects_unknown() {
        let store = RoleStore::new(setup_test_db().await);

        assert_eq!(store.get_role("radiologist").await.unwrap().name, "RADIOLOGIST");
        assert!(matches!(
            store.get_role("JANITOR").await,
            Err(InternalError::Role(RoleError::UnknownRole(_)))
        ));
    }

    #[tokio::test]
    async fn test_assign_role_is_idempotent() {
        let db = setup_test_db().await;
        let user_id = create_user(&db, "doc@example.com").await;
        let store = RoleStore::new(db);

        assert!(store.assign_role(&user_id, "doctor").await.unwrap());
        assert!(!store.assign_role(&user_id, "DOCTOR").await.unwrap());

        assert_eq!(store.roles_for_user(&user_id).await.unwrap(), vec!["DOCTOR"]);
    }

    #[tokio::test]
    async fn test_revoke_role_reports_whether_anything_changed() {
        let db = setup_test_db().await;
        let user_id = create_user(&db, "tech@example.com").await;
        let store = RoleStore::new(db);
        store.assign_role(&user_id, "TECHNICIAN").await.unwrap();

        assert!(store.revoke_role(&user_id, "technician").await.unwrap());
        assert!(!store.revoke_role(&user_id, "TECHNICIAN").await.unwrap());
        assert!(store.roles_for_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roles_for_users_groups_by_user() {
        let db = setup_test_db().await;
        let first = create_user(&db, "first@example.com").await;
        let second = create_user(&db, "second@example.com").await;
        let third = create_user(&db, "third@example.com").await;
        let store = RoleStore::new(db);
        store.assign_role(&first, "VIEWER").await.unwrap();
        store.assign_role(&first, "ADMIN").await.unwrap();
        store.assign_role(&second, "DOCTOR").await.unwrap();

        let roles = store
            .roles_for_users(&[first.clone(), second.clone(), third.clone()])
            .await
            .unwrap();

        assert_eq!(roles.get(&first), Some(&vec!["ADMIN".to_string(), "VIEWER".to_string()]));
        assert_eq!(roles.get(&second), Some(&vec!["DOCTOR".to_string()]));
        assert!(!roles.contains_key(&third));
    }
}
