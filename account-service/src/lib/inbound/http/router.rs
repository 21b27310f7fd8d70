use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use super::middleware::manage_session;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;
use crate::outbound::session::SessionFactory;

/// Shared handler dependencies. Trait objects rather than concrete types so
/// the HTTP layer can be exercised against in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub sessions: Arc<dyn SessionFactory>,
}

pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/users", post(create_user).get(list_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(state.clone(), manage_session))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Mock services and probe-backed state for HTTP layer tests.

    use async_trait::async_trait;
    use auth::AuthenticationResult;
    use mockall::mock;

    use crate::domain::auth::errors::AuthError;
    use crate::domain::auth::models::{Credentials, Principal};
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::{CreateUserCommand, UpdateUserCommand, User, UserId};
    use crate::outbound::session::probe::ProbeSessionFactory;
    use crate::outbound::session::SharedSession;

    use super::*;

    mock! {
        pub UserSvc {}

        #[async_trait]
        impl UserServicePort for UserSvc {
            async fn create_user(
                &self,
                session: &SharedSession,
                command: CreateUserCommand,
            ) -> Result<User, UserError>;

            async fn list_users(&self, session: &SharedSession) -> Result<Vec<User>, UserError>;

            async fn get_user(&self, session: &SharedSession, id: UserId)
                -> Result<User, UserError>;

            async fn update_user(
                &self,
                session: &SharedSession,
                id: UserId,
                command: UpdateUserCommand,
            ) -> Result<User, UserError>;

            async fn delete_user(
                &self,
                session: &SharedSession,
                id: UserId,
            ) -> Result<(), UserError>;
        }
    }

    mock! {
        pub AuthSvc {}

        #[async_trait]
        impl AuthServicePort for AuthSvc {
            async fn login(
                &self,
                session: &SharedSession,
                credentials: Credentials,
            ) -> Result<AuthenticationResult, AuthError>;

            async fn resolve_bearer(
                &self,
                session: &SharedSession,
                bearer_token: Option<String>,
            ) -> Result<Principal, AuthError>;
        }
    }

    pub(crate) fn state_with(
        user_service: MockUserSvc,
        auth_service: MockAuthSvc,
        sessions: ProbeSessionFactory,
    ) -> AppState {
        AppState {
            user_service: Arc::new(user_service),
            auth_service: Arc::new(auth_service),
            sessions: Arc::new(sessions),
        }
    }
}
