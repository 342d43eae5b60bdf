//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::domain::{Role, validate_email, validate_username};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn check_password_length(&self, password: &str) -> Result<(), AuthError> {
        let min = self.security.min_password_length;
        if password.chars().count() < min {
            return Err(AuthError::Validation(format!(
                "Password must be at least {min} characters"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, AuthError> {
        validate_username(username).map_err(AuthError::Validation)?;
        validate_email(email).map_err(AuthError::Validation)?;
        self.check_password_length(password)?;

        if self
            .store
            .is_username_or_email_taken(Some(username), Some(email), None)
            .await?
        {
            return Err(AuthError::AlreadyRegistered);
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role: Role::User,
                },
                &self.security,
            )
            .await
            .map_err(|e| {
                // A concurrent registration can still hit the unique index.
                if format!("{e:#}").contains("UNIQUE") {
                    AuthError::AlreadyRegistered
                } else {
                    AuthError::from(e)
                }
            })?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(UserInfo::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        Ok(LoginResult {
            api_key: user.api_key.clone(),
            user: UserInfo::from(user),
        })
    }

    async fn get_user_info(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_password_length(new_password)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let is_valid = self
            .store
            .check_user_password(user_id, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation("Current password is incorrect".to_string()));
        }

        self.store
            .update_user_password(user_id, new_password, &self.security)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    async fn get_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.api_key)
    }

    async fn regenerate_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        let new_api_key = self.store.regenerate_user_api_key(user_id).await?;
        info!(user_id, "API key regenerated");
        Ok(new_api_key)
    }
}
