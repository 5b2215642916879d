// handlers/protected/mod.rs - Protected handlers (session token required)
//
// Every route here sits behind `middleware::session_middleware`, which
// resolves the bearer token and injects `AuthUser`.

pub mod auth;

pub use auth::*;
