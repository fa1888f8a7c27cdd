pub mod auth;

pub use auth::{require_auth, AUTH_HEADER};
