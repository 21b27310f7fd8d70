use async_trait::async_trait;
use auth::AuthenticationResult;

use crate::outbound::session::SharedSession;

use super::errors::AuthError;
use super::models::{Credentials, Principal};

/// Authentication use cases exposed to the inbound layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and mint an access token for the user.
    async fn login(
        &self,
        session: &SharedSession,
        credentials: Credentials,
    ) -> Result<AuthenticationResult, AuthError>;

    /// Resolve the principal behind an `Authorization` header value, if any.
    ///
    /// An absent or undecodable token resolves to
    /// [`Principal::Unauthenticated`] rather than an error; an expired token
    /// and a token for a missing or deactivated user are rejected outright.
    async fn resolve_bearer(
        &self,
        session: &SharedSession,
        bearer_token: Option<String>,
    ) -> Result<Principal, AuthError>;
}
