use axum::{extract::State, response::Json};

use crate::auth::UserRecord;
use crate::state::AppState;

/// GET /users - Registered users in signup order
///
/// Records serialize as `{ "username", "created_at" }`; password hashes
/// are never included.
pub async fn users_get(State(state): State<AppState>) -> Json<Vec<UserRecord>> {
    let users = state.directory.list().await;
    tracing::debug!("Listing {} registered users", users.len());
    Json(users)
}
