use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use futures::FutureExt;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

/// Middleware that scopes one database session to each request.
///
/// A session (one transaction) is acquired up front and shared with the
/// handlers through request extensions. Once the response comes back the
/// transaction is committed for success statuses and rolled back for error
/// statuses or a panicking handler; the session is released either way.
pub async fn manage_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = match state.sessions.acquire().await {
        Ok(session) => SharedSession::new(session),
        Err(e) => {
            tracing::error!(error = %e, "failed to acquire a database session");
            return ApiError::from(e).into_response();
        }
    };

    req.extensions_mut().insert(session.clone());

    let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;

    let response = match outcome {
        Ok(response) if response.status().is_success() => {
            match session.lock().await.commit().await {
                Ok(()) => response,
                Err(e) => {
                    tracing::error!(error = %e, "failed to commit the request transaction");
                    ApiError::from(e).into_response()
                }
            }
        }
        Ok(response) => {
            if let Err(e) = session.lock().await.rollback().await {
                tracing::error!(error = %e, "failed to roll back the request transaction");
            }
            response
        }
        Err(panic) => {
            if let Err(e) = session.lock().await.rollback().await {
                tracing::error!(error = %e, "failed to roll back after a panic");
            }
            tracing::error!(panic = %panic_message(&panic), "handler panicked");
            ApiError::InternalServerError("handler panicked".to_string()).into_response()
        }
    };

    session.lock().await.release().await;

    response
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Middleware that resolves the bearer token into a [`Principal`] and
/// stores it in request extensions.
///
/// Requests without a usable token pass through as unauthenticated;
/// protected handlers reject them via the `AuthenticatedUser` extractor.
/// Expired and user-invalidated tokens are rejected here.
///
/// [`Principal`]: crate::domain::auth::models::Principal
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers());

    let Some(session) = req.extensions().get::<SharedSession>().cloned() else {
        tracing::error!("no session on request; session middleware must run first");
        return Err(
            ApiError::InternalServerError("request session missing".to_string()).into_response(),
        );
    };

    let principal = state
        .auth_service
        .resolve_bearer(&session, token)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// The token from an `Authorization: Bearer <token>` header, if present
/// and well formed.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
