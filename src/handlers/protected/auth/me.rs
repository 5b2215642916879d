use axum::{extract::Extension, response::Json};
use serde::{Deserialize, Serialize};

use crate::middleware::AuthUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
}

/// GET /me - Current user for the presented token
///
/// Header: `Authorization: Bearer <token>` (the `Bearer ` prefix is optional)
///
/// Expected Output:
/// ```json
/// { "username": "alice" }
/// ```
///
/// Errors from the session middleware: 401 missing header or invalid token,
/// 404 when the token's user is no longer registered.
pub async fn me_get(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}
