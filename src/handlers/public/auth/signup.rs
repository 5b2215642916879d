// handlers/public/auth/signup.rs - POST /signup handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use super::{CredentialsRequest, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /signup - Register a new user account
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "pw" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "message": "Signup successful" }
/// ```
///
/// Errors: 400 when the username is taken or empty, or the body is not valid JSON.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Signup request received: {:?}", request);

    let record = state
        .directory
        .register(&request.username, &request.password)
        .await
        .map_err(|err| {
            tracing::debug!("Signup rejected for '{}': {}", request.username, err);
            ApiError::from(err)
        })?;

    tracing::info!("Registered user '{}'", record.username);

    Ok(Json(MessageResponse {
        message: "Signup successful".to_string(),
    }))
}
