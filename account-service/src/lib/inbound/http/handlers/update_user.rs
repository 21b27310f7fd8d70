use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthenticatedUser;
use super::UserData;
use crate::domain::user::errors::UsernameError;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<SharedSession>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .update_user(&session, user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for updating a user; absent fields are left unchanged
/// (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct UpdateUserRequest {
    username: Option<String>,
    password: Option<String>,
    last_name: Option<String>,
    first_name: Option<String>,
    is_admin: Option<bool>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateUserRequestError {
    #[error("invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("password must not be empty")]
    EmptyPassword,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUpdateUserRequestError> {
        let username = self.username.as_deref().map(Username::new).transpose()?;
        if matches!(self.password.as_deref(), Some("")) {
            return Err(ParseUpdateUserRequestError::EmptyPassword);
        }
        Ok(UpdateUserCommand {
            username,
            password: self.password,
            last_name: self.last_name,
            first_name: self.first_name,
            is_admin: self.is_admin,
        })
    }
}

impl From<ParseUpdateUserRequestError> for ApiError {
    fn from(err: ParseUpdateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
