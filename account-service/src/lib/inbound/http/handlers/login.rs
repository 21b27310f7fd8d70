use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::Credentials;
use crate::inbound::http::router::AppState;
use crate::outbound::session::SharedSession;

pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SharedSession>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let credentials = Credentials {
        username: body.username,
        password: body.password,
    };

    state
        .auth_service
        .login(&session, credentials)
        .await
        .map_err(ApiError::from)
        .map(|result| {
            ApiSuccess::new(
                StatusCode::OK,
                LoginResponseData {
                    token_type: result.token_type,
                    access_token: result.access_token,
                },
            )
        })
}

/// HTTP request body for a login attempt (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token_type: String,
    pub access_token: String,
}
