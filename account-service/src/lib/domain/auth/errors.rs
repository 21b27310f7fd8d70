use thiserror::Error;

use crate::domain::user::errors::UserError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password must both be provided")]
    InvalidCredentialsInput,
    #[error("login failed")]
    LoginFailed,
    #[error("token has expired")]
    ExpiredToken,
    #[error("token is invalid")]
    InvalidToken,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
