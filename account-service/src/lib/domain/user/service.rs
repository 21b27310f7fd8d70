use std::sync::Arc;

use async_trait::async_trait;

use crate::outbound::session::SharedSession;

use super::errors::UserError;
use super::models::{CreateUserCommand, NewUser, UpdateUserCommand, User, UserId};
use super::ports::{UserRepository, UserServicePort};

/// User account use cases on top of a [`UserRepository`].
///
/// Password hashing is CPU-bound (36k PBKDF2 rounds), so it is pushed onto
/// the blocking thread pool instead of stalling the async executor.
#[derive(Debug, Clone)]
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

async fn hash_password_blocking(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || auth::password::make_password(&password))
        .await
        .map_err(|e| UserError::Unknown(format!("hashing task failed: {e}")))?
        .map_err(UserError::Password)
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(
        &self,
        session: &SharedSession,
        command: CreateUserCommand,
    ) -> Result<User, UserError> {
        let password_hash = hash_password_blocking(command.password).await?;

        let new_user = NewUser {
            username: command.username.as_str().to_string(),
            password_hash,
            last_name: command.last_name,
            first_name: command.first_name,
            is_admin: command.is_admin,
            is_active: true,
        };

        let user = self.repository.create(session, new_user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "created user");

        Ok(user)
    }

    async fn list_users(&self, session: &SharedSession) -> Result<Vec<User>, UserError> {
        self.repository.list_all(session).await
    }

    async fn get_user(&self, session: &SharedSession, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(session, id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        session: &SharedSession,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(session, id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        if let Some(username) = command.username {
            user.username = username.as_str().to_string();
        }
        if let Some(password) = command.password {
            user.password_hash = hash_password_blocking(password).await?;
        }
        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }
        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }
        if let Some(is_admin) = command.is_admin {
            user.is_admin = is_admin;
        }

        self.repository.update(session, user).await
    }

    async fn delete_user(&self, session: &SharedSession, id: UserId) -> Result<(), UserError> {
        self.repository.delete(session, id).await?;

        tracing::info!(user_id = %id, "deleted user");

        Ok(())
    }
}
