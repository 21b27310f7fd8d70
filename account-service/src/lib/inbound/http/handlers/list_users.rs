use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::AuthenticatedUser;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<SharedSession>,
    _caller: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .user_service
        .list_users(&session)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            let data = users.iter().map(UserData::from).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}
