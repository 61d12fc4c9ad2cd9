use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::stores::is_unique_violation;
use crate::types::db::auth_token::{self, Entity as AuthToken};
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::db::user_role::{self, Entity as UserRole};
use crate::types::internal::auth::SUPERUSER_ROLE;

/// Data for a user row about to be inserted
///
/// `email` and `username` are normalised by the store; `password_hash` must
/// already be an Argon2 PHC string.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_approved: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Status buckets used to filter user listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    /// Active but not yet approved
    Pending,
    /// Active and approved
    Active,
    /// Deactivated
    Inactive,
}

/// Lowercased, trimmed email; the canonical login handle
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercased, trimmed username used for case-insensitive uniqueness
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// UserStore manages user accounts and their status flags
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new user
    ///
    /// A username containing `@` must be the account's own email, so no
    /// account can claim another address as its login alias.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(InternalError)` - InvalidUsername, DuplicateEmail / DuplicateUsername, or a database error
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let email = normalize_email(&new_user.email);
        let username = new_user
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&email)
            .to_string();
        let username_normalized = normalize_username(&username);

        if username_normalized.contains('@') && username_normalized != email {
            return Err(CredentialError::InvalidUsername(username).into());
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail(email).into());
        }
        if self.username_in_use(&username_normalized).await? {
            return Err(CredentialError::DuplicateUsername(username).into());
        }

        let now = Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.clone()),
            username: Set(username.clone()),
            username_normalized: Set(username_normalized),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            is_active: Set(new_user.is_active),
            is_approved: Set(new_user.is_approved),
            is_staff: Set(new_user.is_staff),
            is_superuser: Set(new_user.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let created = match model.insert(&self.db).await {
            Ok(created) => created,
            // Lost a race with a concurrent registration
            Err(e) if is_unique_violation(&e) => {
                return Err(self.duplicate_error(email, username).await);
            }
            Err(e) => return Err(InternalError::database("create_user", e)),
        };

        tracing::info!(user_id = %created.id, "User created");

        Ok(created)
    }

    /// Resolve a user by email or username, case-insensitively
    ///
    /// An email match wins over a username match when the identifier is
    /// ambiguous (one user's username equals another user's email).
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<user::Model>, InternalError> {
        let normalized = identifier.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(None);
        }

        let candidates = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(normalized.clone()))
                    .add(user::Column::UsernameNormalized.eq(normalized.clone())),
            )
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_identifier", e))?;

        let mut email_match = None;
        let mut username_match = None;
        for candidate in candidates {
            if candidate.email == normalized {
                email_match = Some(candidate);
            } else {
                username_match = Some(candidate);
            }
        }

        Ok(email_match.or(username_match))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Get a user by id, or `CredentialError::UserNotFound`
    pub async fn get_by_id(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()).into())
    }

    /// Name the column that clashed after a unique violation on insert
    async fn duplicate_error(&self, email: String, username: String) -> InternalError {
        match self.find_by_email(&email).await {
            Ok(Some(_)) => CredentialError::DuplicateEmail(email).into(),
            Ok(None) => CredentialError::DuplicateUsername(username).into(),
            Err(e) => e,
        }
    }

    async fn username_in_use(&self, username_normalized: &str) -> Result<bool, InternalError> {
        let existing = User::find()
            .filter(user::Column::UsernameNormalized.eq(username_normalized))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("username_in_use", e))?;

        Ok(existing.is_some())
    }

    /// List users ordered by creation time, optionally filtered by status
    pub async fn list_users(&self, status: Option<UserStatus>) -> Result<Vec<user::Model>, InternalError> {
        let mut query = User::find();

        query = match status {
            Some(UserStatus::Pending) => query
                .filter(user::Column::IsActive.eq(true))
                .filter(user::Column::IsApproved.eq(false)),
            Some(UserStatus::Active) => query
                .filter(user::Column::IsActive.eq(true))
                .filter(user::Column::IsApproved.eq(true)),
            Some(UserStatus::Inactive) => query.filter(user::Column::IsActive.eq(false)),
            None => query,
        };

        query
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn set_active(&self, user_id: &str, is_active: bool) -> Result<user::Model, InternalError> {
        self.update_user(user_id, "set_active", |model| {
            model.is_active = Set(is_active);
        })
        .await
    }

    pub async fn set_approved(&self, user_id: &str, is_approved: bool) -> Result<user::Model, InternalError> {
        self.update_user(user_id, "set_approved", |model| {
            model.is_approved = Set(is_approved);
        })
        .await
    }

    pub async fn set_password_hash(&self, user_id: &str, password_hash: String) -> Result<user::Model, InternalError> {
        self.update_user(user_id, "set_password_hash", |model| {
            model.password_hash = Set(password_hash);
        })
        .await
    }

    /// Grant full administrative status
    ///
    /// Sets the active, approved, staff and superuser flags and assigns the
    /// `SUPERUSER` role in one transaction.
    pub async fn promote_to_superuser(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let existing = User::find_by_id(user_id.to_string())
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))?
            .ok_or_else(|| InternalError::from(CredentialError::UserNotFound(user_id.to_string())))?;

        let mut model = existing.into_active_model();
        model.is_active = Set(true);
        model.is_approved = Set(true);
        model.is_staff = Set(true);
        model.is_superuser = Set(true);
        model.updated_at = Set(Utc::now().timestamp());
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("promote_to_superuser", e))?;

        let has_role = UserRole::find_by_id((user_id.to_string(), SUPERUSER_ROLE.to_string()))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_user_role", e))?
            .is_some();
        if !has_role {
            user_role::ActiveModel {
                user_id: Set(user_id.to_string()),
                role_name: Set(SUPERUSER_ROLE.to_string()),
                assigned_at: Set(Utc::now().timestamp()),
            }
            .insert(&txn)
            .await
            .map_err(|e| InternalError::database("assign_superuser_role", e))?;
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(user_id = %user_id, "User promoted to superuser");

        Ok(updated)
    }

    pub async fn record_login(&self, user_id: &str) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        User::update_many()
            .col_expr(user::Column::LastLoginAt, sea_orm::sea_query::Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("record_login", e))?;

        Ok(())
    }

    async fn update_user<F>(&self, user_id: &str, operation: &str, apply: F) -> Result<user::Model, InternalError>
    where
        F: FnOnce(&mut ActiveModel),
    {
        let mut model = self.get_by_id(user_id).await?.into_active_model();
        apply(&mut model);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database(operation, e))
    }

    /// Clear `is_active` and delete the user's token in one transaction
    pub async fn deactivate_user(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let mut model = User::find_by_id(user_id.to_string())
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))?
            .ok_or_else(|| InternalError::from(CredentialError::UserNotFound(user_id.to_string())))?
            .into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Utc::now().timestamp());
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("deactivate_user", e))?;

        AuthToken::delete_many()
            .filter(auth_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_tokens", e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(user_id = %user_id, "User deactivated and token revoked");

        Ok(updated)
    }

    /// Delete a user together with its token and role assignments
    pub async fn delete_user(&self, user_id: &str) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        AuthToken::delete_many()
            .filter(auth_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_tokens", e))?;

        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_roles", e))?;

        let result = User::delete_by_id(user_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::UserNotFound(user_id.to_string()).into());
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(user_id = %user_id, "User deleted");

        Ok(())
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").field("db", &"<connection>").finish()
    }
}
