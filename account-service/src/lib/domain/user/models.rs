use std::fmt::Display;

use chrono::DateTime;
use chrono::Utc;

use super::errors::{UserIdError, UsernameError};

/// Database identifier of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    pub fn from_string(raw: &str) -> Result<Self, UserIdError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| UserIdError::InvalidFormat(raw.to_string()))
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    pub fn new(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();
        Self::with_valid_length(trimmed)?;
        Self::with_valid_chars(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    fn with_valid_length(value: &str) -> Result<(), UsernameError> {
        let actual = value.chars().count();
        if actual < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual,
            });
        }
        if actual > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual,
            });
        }
        Ok(())
    }

    fn with_valid_chars(value: &str) -> Result<(), UsernameError> {
        if value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(())
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub last_name: String,
    pub first_name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields needed to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub last_name: String,
    pub first_name: String,
    pub is_admin: bool,
    pub is_active: bool,
}

/// Validated request to create a user.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: Username,
    pub password: String,
    pub last_name: String,
    pub first_name: String,
    pub is_admin: bool,
}

/// Partial update of a user; only the provided fields change.
///
/// `is_active` and the timestamps are managed server-side and are
/// deliberately absent here.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub username: Option<Username>,
    pub password: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub is_admin: Option<bool>,
}
