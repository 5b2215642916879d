pub mod me; // GET /me - identity behind the current token

pub use me::me_get;
