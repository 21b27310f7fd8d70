use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::errors::UsernameError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(session): Extension<SharedSession>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .create_user(&session, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    username: String,
    password: String,
    last_name: String,
    first_name: String,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("password must not be empty")]
    EmptyPassword,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let username = Username::new(&self.username)?;
        if self.password.is_empty() {
            return Err(ParseCreateUserRequestError::EmptyPassword);
        }
        Ok(CreateUserCommand {
            username,
            password: self.password,
            last_name: self.last_name,
            first_name: self.first_name,
            is_admin: self.is_admin,
        })
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: password.to_string(),
            last_name: "Doe".to_string(),
            first_name: "Jane".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn parses_valid_body_into_command() {
        let command = request("alice", "hunter22").try_into_command().unwrap();
        assert_eq!(command.username.as_str(), "alice");
        assert!(!command.is_admin);
    }

    #[test]
    fn rejects_invalid_username_as_validation_error() {
        let err = request("x", "hunter22").try_into_command().unwrap_err();
        assert!(matches!(
            err.clone(),
            ParseCreateUserRequestError::Username(_)
        ));
        assert_eq!(ApiError::from(err), ApiError::UnprocessableEntity(
            "invalid username: username must be at least 3 characters, got 1".to_string(),
        ));
    }

    #[test]
    fn rejects_empty_password() {
        let err = request("alice", "").try_into_command().unwrap_err();
        assert!(matches!(err, ParseCreateUserRequestError::EmptyPassword));
    }
}
