use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("user id is not a valid integer: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
    #[error("username must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("username may only contain letters, digits, '_' and '-'")]
    InvalidCharacters,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    InvalidUserId(#[from] UserIdError),
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    #[error(transparent)]
    Password(#[from] auth::PasswordError),
    #[error("user not found: {0}")]
    NotFound(String),
    #[error("username already taken: {0}")]
    UsernameAlreadyExists(String),
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("unknown error: {0}")]
    Unknown(String),
}
