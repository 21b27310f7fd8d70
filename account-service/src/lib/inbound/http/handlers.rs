use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Principal;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::{User, UserId};
use crate::outbound::session::SessionError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    InvalidUsernameOrPassword(String),
    FailureLogin(String),
    ExpiredToken,
    InvalidToken,
    InternalServerError(String),
}

impl ApiError {
    fn status_and_detail(self) -> (StatusCode, ApiErrorDetail) {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiErrorDetail::new("BAD_REQUEST", msg))
            }
            ApiError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail::new("VALIDATION_ERROR", msg),
            ),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ApiErrorDetail::new("NOT_FOUND", msg))
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, ApiErrorDetail::new("CONFLICT", msg))
            }
            ApiError::InvalidUsernameOrPassword(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail::new("INVALID_USERNAME_OR_PASSWORD", msg),
            ),
            ApiError::FailureLogin(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail::new("FAILURE_LOGIN", msg),
            ),
            ApiError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                ApiErrorDetail::new("EXPIRED_TOKEN", "token has expired".to_string()),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ApiErrorDetail::new("INVALID_TOKEN", "token is invalid".to_string()),
            ),
            ApiError::InternalServerError(detail) => {
                tracing::error!(detail = %detail, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorDetail::new(
                        "INTERNAL_SERVER_ERROR",
                        "internal server error".to_string(),
                    ),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        (status, Json(vec![detail])).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidUsername(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::InvalidUserId(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_)
            | UserError::DatabaseError(_)
            | UserError::Session(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentialsInput => {
                ApiError::InvalidUsernameOrPassword(err.to_string())
            }
            AuthError::LoginFailed => ApiError::FailureLogin(err.to_string()),
            AuthError::ExpiredToken => ApiError::ExpiredToken,
            AuthError::InvalidToken => ApiError::InvalidToken,
            AuthError::Internal(detail) => ApiError::InternalServerError(detail),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

/// One element of the error response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorDetail {
    pub error_code: String,
    pub error_msg: String,
}

impl ApiErrorDetail {
    fn new(error_code: &str, error_msg: String) -> Self {
        Self {
            error_code: error_code.to_string(),
            error_msg,
        }
    }
}

/// User fields exposed over the API; the password hash never leaves the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub last_name: String,
    pub first_name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Extractor for handlers that require an authenticated caller.
///
/// The authentication middleware resolves the bearer token into a
/// [`Principal`] on every request; this extractor turns an unauthenticated
/// principal into a 401 so protected handlers never see one.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(Principal::Authenticated { user_id, username }) => Ok(AuthenticatedUser {
                user_id: *user_id,
                username: username.clone(),
            }),
            _ => Err(ApiError::InvalidToken),
        }
    }
}
