use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::AuthenticatedUser;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<SharedSession>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .delete_user(&session, user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
