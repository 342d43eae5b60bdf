//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, UserUpdate};
use crate::domain::{validate_email, validate_username};
use crate::services::auth_service::UserInfo;
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn get_profile(&self, user_id: i32) -> Result<UserInfo, UserError> {
        self.store
            .get_user(user_id)
            .await?
            .map(UserInfo::from)
            .ok_or(UserError::NotFound(user_id))
    }

    async fn list(&self) -> Result<Vec<UserInfo>, UserError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    async fn update(&self, user_id: i32, update: UserUpdate) -> Result<UserInfo, UserError> {
        if let Some(username) = &update.username {
            validate_username(username).map_err(UserError::Validation)?;
        }
        if let Some(email) = &update.email {
            validate_email(email).map_err(UserError::Validation)?;
        }

        if (update.username.is_some() || update.email.is_some())
            && self
                .store
                .is_username_or_email_taken(
                    update.username.as_deref(),
                    update.email.as_deref(),
                    Some(user_id),
                )
                .await?
        {
            return Err(UserError::Conflict);
        }

        let user = self
            .store
            .update_user(user_id, update)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        info!(user_id, role = %user.role, is_active = user.is_active, "User updated");
        Ok(UserInfo::from(user))
    }

    async fn delete(&self, user_id: i32, actor_id: i32) -> Result<(), UserError> {
        if user_id == actor_id {
            return Err(UserError::Validation(
                "You cannot delete your own account".to_string(),
            ));
        }

        if !self.store.delete_user(user_id).await? {
            return Err(UserError::NotFound(user_id));
        }

        info!(user_id, actor_id, "User deleted");
        Ok(())
    }
}
