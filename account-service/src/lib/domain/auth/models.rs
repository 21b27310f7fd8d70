use crate::domain::user::models::UserId;

/// Username and password as submitted by a login request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The identity resolved from a request, attached to request extensions by
/// the authentication middleware.
#[derive(Debug, Clone)]
pub enum Principal {
    Authenticated { user_id: UserId, username: String },
    Unauthenticated,
}

impl Principal {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated { .. })
    }
}
