// handlers/public/auth/signin.rs - POST /signin handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::CredentialsRequest;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SigninResponse {
    pub message: String,
    pub token: String,
}

/// POST /signin - Verify credentials and receive a session token
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "pw" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "message": "Signin successful", "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Unknown usernames and wrong passwords both answer 401 "Invalid credentials".
pub async fn signin_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!("Signin request received: {:?}", request);

    let record = match state.credentials.check(&request.username, &request.password).await {
        Some(record) => record,
        None => {
            tracing::warn!("Failed signin attempt for '{}'", request.username);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let token = state.issuer.issue(&record.username)?;
    tracing::info!("Issued token for '{}'", record.username);

    Ok(Json(SigninResponse {
        message: "Signin successful".to_string(),
        token: token.into_string(),
    }))
}
