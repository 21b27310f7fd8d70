use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::{NewUser, User, UserId, Username};
use crate::domain::user::ports::UserRepository;
use crate::outbound::session::{SessionError, SharedSession};

/// User persistence on Postgres. Every query runs on the transaction held
/// by the request session, so nothing here commits or rolls back.
#[derive(Debug, Clone, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    pub fn new() -> Self {
        Self
    }

    fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
        Ok(User {
            id: UserId(row.try_get::<i64, _>("id")?),
            username: row.try_get("username")?,
            password_hash: row.try_get("password")?,
            last_name: row.try_get("last_name")?,
            first_name: row.try_get("first_name")?,
            is_admin: row.try_get("is_admin")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at")?,
        })
    }
}

fn session_error(e: SessionError) -> UserError {
    UserError::Session(e.to_string())
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn is_username_conflict(e: &sqlx::Error) -> bool {
    matches!(
        e.as_database_error().and_then(|dbe| dbe.constraint()),
        Some("users_username_key")
    )
}

const USER_COLUMNS: &str =
    "id, username, password, last_name, first_name, is_admin, is_active, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, session: &SharedSession, new_user: NewUser) -> Result<User, UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let query = format!(
            "INSERT INTO users (username, password, last_name, first_name, is_admin, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(&new_user.last_name)
            .bind(&new_user.first_name)
            .bind(new_user.is_admin)
            .bind(new_user.is_active)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                if is_username_conflict(&e) {
                    UserError::UsernameAlreadyExists(new_user.username.clone())
                } else {
                    database_error(e)
                }
            })?;

        Self::row_to_user(&row).map_err(database_error)
    }

    async fn find_by_id(
        &self,
        session: &SharedSession,
        id: UserId,
    ) -> Result<Option<User>, UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(conn)
            .await
            .map_err(database_error)?;

        row.as_ref()
            .map(Self::row_to_user)
            .transpose()
            .map_err(database_error)
    }

    async fn find_by_username(
        &self,
        session: &SharedSession,
        username: &Username,
    ) -> Result<Option<User>, UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        let row = sqlx::query(&query)
            .bind(username.as_str())
            .fetch_optional(conn)
            .await
            .map_err(database_error)?;

        row.as_ref()
            .map(Self::row_to_user)
            .transpose()
            .map_err(database_error)
    }

    async fn list_all(&self, session: &SharedSession) -> Result<Vec<User>, UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");

        let rows = sqlx::query(&query)
            .fetch_all(conn)
            .await
            .map_err(database_error)?;

        rows.iter()
            .map(Self::row_to_user)
            .collect::<Result<Vec<_>, _>>()
            .map_err(database_error)
    }

    async fn update(&self, session: &SharedSession, user: User) -> Result<User, UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let query = format!(
            "UPDATE users \
             SET username = $2, password = $3, last_name = $4, first_name = $5, \
                 is_admin = $6, is_active = $7, updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(user.id.0)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.last_name)
            .bind(&user.first_name)
            .bind(user.is_admin)
            .bind(user.is_active)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                if is_username_conflict(&e) {
                    UserError::UsernameAlreadyExists(user.username.clone())
                } else {
                    database_error(e)
                }
            })?;

        match row {
            Some(row) => Self::row_to_user(&row).map_err(database_error),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn delete(&self, session: &SharedSession, id: UserId) -> Result<(), UserError> {
        let mut session = session.lock().await;
        let conn = session.conn().map_err(session_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(conn)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
