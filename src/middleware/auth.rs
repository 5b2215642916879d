use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::auth::{SessionError, UserRecord};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context resolved from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for AuthUser {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            created_at: record.created_at,
        }
    }
}

/// Session middleware that resolves the bearer token to a registered user
/// and injects it as an `AuthUser` extension
pub async fn session_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = extract_authorization(&headers)?;

    let record = state.sessions.resolve(header).await.map_err(|err| {
        match &err {
            SessionError::MissingHeader => tracing::debug!("Rejected request without authorization header"),
            SessionError::InvalidToken(reason) => tracing::warn!("Rejected token: {}", reason),
            SessionError::UserNotFound(username) => {
                tracing::warn!("Token for unknown user '{}'", username)
            }
        }
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(AuthUser::from(record));

    Ok(next.run(request).await)
}

/// Read the Authorization header; non-ASCII values can never be valid tokens
fn extract_authorization(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    match headers.get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ApiError::unauthorized("Invalid token")),
    }
}
