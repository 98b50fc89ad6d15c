//! Authentication middleware for Classhub
//!
//! The identity provider issues HS256 session JWTs; this crate validates
//! them and exposes the caller's user id through the `AuthUser` extractor,
//! which works with any domain state implementing `FromRef<S>` for
//! `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;

pub use backend::AuthBackend;
pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
