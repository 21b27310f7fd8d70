use async_trait::async_trait;

use crate::outbound::session::SharedSession;

use super::errors::UserError;
use super::models::{CreateUserCommand, NewUser, UpdateUserCommand, User, UserId, Username};

/// Use cases exposed to the inbound layer.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    async fn create_user(
        &self,
        session: &SharedSession,
        command: CreateUserCommand,
    ) -> Result<User, UserError>;

    async fn list_users(&self, session: &SharedSession) -> Result<Vec<User>, UserError>;

    async fn get_user(&self, session: &SharedSession, id: UserId) -> Result<User, UserError>;

    async fn update_user(
        &self,
        session: &SharedSession,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    async fn delete_user(&self, session: &SharedSession, id: UserId) -> Result<(), UserError>;
}

/// Persistence operations for user rows. Every call runs inside the
/// transaction held by the given session.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn create(&self, session: &SharedSession, new_user: NewUser) -> Result<User, UserError>;

    async fn find_by_id(
        &self,
        session: &SharedSession,
        id: UserId,
    ) -> Result<Option<User>, UserError>;

    async fn find_by_username(
        &self,
        session: &SharedSession,
        username: &Username,
    ) -> Result<Option<User>, UserError>;

    async fn list_all(&self, session: &SharedSession) -> Result<Vec<User>, UserError>;

    async fn update(&self, session: &SharedSession, user: User) -> Result<User, UserError>;

    async fn delete(&self, session: &SharedSession, id: UserId) -> Result<(), UserError>;
}
