use std::sync::Arc;

use async_trait::async_trait;
use auth::{AuthenticationResult, Authenticator, JwtError};

use crate::domain::user::models::{UserId, Username};
use crate::domain::user::ports::UserRepository;
use crate::outbound::session::SharedSession;

use super::errors::AuthError;
use super::models::{Credentials, Principal};
use super::ports::AuthServicePort;

/// Login and token resolution on top of a [`UserRepository`] and the
/// credential toolkit from the `auth` crate.
///
/// Every failed login collapses to the same [`AuthError::LoginFailed`] so
/// responses do not reveal whether the username exists.
#[derive(Debug, Clone)]
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn verify_password_blocking(
        &self,
        password: String,
        password_hash: String,
    ) -> Result<bool, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || {
            authenticator.verify_password(Some(&password), Some(&password_hash))
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(
        &self,
        session: &SharedSession,
        credentials: Credentials,
    ) -> Result<AuthenticationResult, AuthError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentialsInput);
        }

        let username = match Username::new(&credentials.username) {
            Ok(username) => username,
            Err(e) => {
                tracing::debug!(error = %e, "login with malformed username");
                return Err(AuthError::LoginFailed);
            }
        };

        let user = self
            .repository
            .find_by_username(session, &username)
            .await?;

        let Some(user) = user else {
            tracing::debug!(username = %username, "login for unknown username");
            return Err(AuthError::LoginFailed);
        };

        let password_ok = self
            .verify_password_blocking(credentials.password, user.password_hash.clone())
            .await?;

        if !password_ok {
            tracing::debug!(username = %username, "login with wrong password");
            return Err(AuthError::LoginFailed);
        }

        if !user.is_active {
            tracing::debug!(username = %username, "login for deactivated account");
            return Err(AuthError::LoginFailed);
        }

        let result = self
            .authenticator
            .issue_token(user.id.0, auth::TokenPurpose::Access)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(result)
    }

    async fn resolve_bearer(
        &self,
        session: &SharedSession,
        bearer_token: Option<String>,
    ) -> Result<Principal, AuthError> {
        let Some(token) = bearer_token else {
            return Ok(Principal::Unauthenticated);
        };

        let claims = match self.authenticator.validate_token(&token) {
            Ok(claims) => claims,
            Err(JwtError::TokenExpired) => return Err(AuthError::ExpiredToken),
            Err(e) => {
                tracing::warn!(error = %e, "rejecting undecodable bearer token");
                return Ok(Principal::Unauthenticated);
            }
        };

        let user = self
            .repository
            .find_by_id(session, UserId(claims.user_id))
            .await?;

        match user {
            Some(user) if user.is_active => Ok(Principal::Authenticated {
                user_id: user.id,
                username: user.username,
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::Algorithm;
    use mockall::mock;

    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::{NewUser, User};
    use crate::outbound::session::probe::SessionProbe;

    use super::*;

    mock! {
        pub Repo {}

        #[async_trait]
        impl UserRepository for Repo {
            async fn create(
                &self,
                session: &SharedSession,
                new_user: NewUser,
            ) -> Result<User, UserError>;

            async fn find_by_id(
                &self,
                session: &SharedSession,
                id: UserId,
            ) -> Result<Option<User>, UserError>;

            async fn find_by_username(
                &self,
                session: &SharedSession,
                username: &Username,
            ) -> Result<Option<User>, UserError>;

            async fn list_all(&self, session: &SharedSession) -> Result<Vec<User>, UserError>;

            async fn update(&self, session: &SharedSession, user: User) -> Result<User, UserError>;

            async fn delete(&self, session: &SharedSession, id: UserId) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(b"test-secret", Algorithm::HS256, 3600))
    }

    fn stored_user(id: i64, username: &str, password: &str, is_active: bool) -> User {
        User {
            id: UserId(id),
            username: username.to_string(),
            password_hash: auth::password::make_password(password).unwrap(),
            last_name: "Doe".to_string(),
            first_name: "Jane".to_string(),
            is_admin: false,
            is_active,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_issues_bearer_token_for_valid_credentials() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_username()
            .once()
            .returning(|_, _| Ok(Some(stored_user(1, "alice", "hunter22", true))));

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let result = service
            .login(&session, credentials("alice", "hunter22"))
            .await
            .unwrap();

        assert_eq!(result.token_type, "bearer");
        let claims = authenticator().validate_token(&result.access_token).unwrap();
        assert_eq!(claims.user_id, 1);
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials_before_any_lookup() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_username().never();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .login(&session, credentials("", "hunter22"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentialsInput));
    }

    #[tokio::test]
    async fn login_fails_for_unknown_username() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_username().once().returning(|_, _| Ok(None));

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .login(&session, credentials("nobody", "hunter22"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::LoginFailed));
    }

    #[tokio::test]
    async fn login_fails_for_wrong_password() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_username()
            .once()
            .returning(|_, _| Ok(Some(stored_user(1, "alice", "hunter22", true))));

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .login(&session, credentials("alice", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::LoginFailed));
    }

    #[tokio::test]
    async fn login_fails_for_deactivated_account() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_username()
            .once()
            .returning(|_, _| Ok(Some(stored_user(1, "alice", "hunter22", false))));

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .login(&session, credentials("alice", "hunter22"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::LoginFailed));
    }

    #[tokio::test]
    async fn resolve_bearer_without_token_is_unauthenticated() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id().never();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let principal = service.resolve_bearer(&session, None).await.unwrap();

        assert!(!principal.is_authenticated());
    }

    #[tokio::test]
    async fn resolve_bearer_with_garbage_token_is_unauthenticated() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id().never();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let principal = service
            .resolve_bearer(&session, Some("not-a-jwt".to_string()))
            .await
            .unwrap();

        assert!(!principal.is_authenticated());
    }

    #[tokio::test]
    async fn resolve_bearer_rejects_expired_token() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id().never();

        let expired = Authenticator::new(b"test-secret", Algorithm::HS256, -3600)
            .issue_token(1, auth::TokenPurpose::Access)
            .unwrap();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .resolve_bearer(&session, Some(expired.access_token))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[tokio::test]
    async fn resolve_bearer_rejects_token_for_missing_user() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id().once().returning(|_, _| Ok(None));

        let token = authenticator()
            .issue_token(42, auth::TokenPurpose::Access)
            .unwrap();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .resolve_bearer(&session, Some(token.access_token))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn resolve_bearer_rejects_token_for_deactivated_user() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .once()
            .returning(|_, _| Ok(Some(stored_user(42, "alice", "hunter22", false))));

        let token = authenticator()
            .issue_token(42, auth::TokenPurpose::Access)
            .unwrap();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let err = service
            .resolve_bearer(&session, Some(token.access_token))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn resolve_bearer_returns_principal_for_valid_token() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .once()
            .returning(|_, _| Ok(Some(stored_user(42, "alice", "hunter22", true))));

        let token = authenticator()
            .issue_token(42, auth::TokenPurpose::Access)
            .unwrap();

        let service = AuthService::new(Arc::new(repo), authenticator());
        let session = SessionProbe::new().shared();

        let principal = service
            .resolve_bearer(&session, Some(token.access_token))
            .await
            .unwrap();

        match principal {
            Principal::Authenticated { user_id, username } => {
                assert_eq!(user_id, UserId(42));
                assert_eq!(username, "alice");
            }
            Principal::Unauthenticated => panic!("expected an authenticated principal"),
        }
    }
}
