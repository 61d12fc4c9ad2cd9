use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::stores::is_unique_violation;
use crate::types::db::auth_token::{self, Entity as AuthToken};

/// TokenStore persists the single opaque API token each user may hold
pub struct TokenStore {
    db: DatabaseConnection,
}

impl TokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Return the user's existing token, or store `candidate_key` as the new one
    ///
    /// # Arguments
    /// * `user_id` - Owner of the token
    /// * `candidate_key` - Freshly generated key, used only when no token exists
    ///
    /// # Returns
    /// * `Ok(auth_token::Model)` - The token now associated with the user
    pub async fn get_or_create(&self, user_id: &str, candidate_key: String) -> Result<auth_token::Model, InternalError> {
        if let Some(existing) = self.find_by_user(user_id).await? {
            return Ok(existing);
        }

        let token = auth_token::ActiveModel {
            key: Set(candidate_key),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().timestamp()),
        };

        match token.insert(&self.db).await {
            Ok(created) => {
                tracing::debug!(user_id = %user_id, "API token created");
                Ok(created)
            }
            Err(insert_err) if is_unique_violation(&insert_err) => {
                // A concurrent login for the same user won the unique constraint
                match self.find_by_user(user_id).await? {
                    Some(winner) => Ok(winner),
                    None => Err(InternalError::database("create_token", insert_err)),
                }
            }
            Err(insert_err) => Err(InternalError::database("create_token", insert_err)),
        }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<auth_token::Model>, InternalError> {
        AuthToken::find()
            .filter(auth_token::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_token_by_user", e))
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<auth_token::Model>, InternalError> {
        AuthToken::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_token_by_key", e))
    }

    /// Delete the user's token
    ///
    /// # Returns
    /// * `Ok(true)` if a token was removed, `Ok(false)` if the user had none
    pub async fn revoke_for_user(&self, user_id: &str) -> Result<bool, InternalError> {
        let result = AuthToken::delete_many()
            .filter(auth_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_token", e))?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %user_id, "API token revoked");
        }

        Ok(result.rows_affected > 0)
    }
}
