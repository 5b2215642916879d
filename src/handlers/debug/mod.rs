// handlers/debug/mod.rs - Development-only introspection
//
// Not mounted unless `debug.expose_users` is enabled.

pub mod users;

pub use users::users_get;
