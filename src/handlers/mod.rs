// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (session token) → Debug (development only)

pub mod debug; // GET /users, mounted only when the debug listing is enabled
pub mod health;
pub mod protected; // Session token required
pub mod public; // Token acquisition

pub use health::health;
