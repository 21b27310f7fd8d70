use thiserror::Error;

/// Error type for password hashing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Plaintext password must not be empty")]
    EmptyPassword,

    #[error("Salt must be non-empty and must not contain the field delimiter")]
    InvalidSalt,

    #[error("Encoded hash is not in the expected four-field format")]
    MalformedHash,
}
