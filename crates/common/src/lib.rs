//! Shared utilities, configuration, and error handling for Classhub
//!
//! - Configuration loaded from the environment
//! - The application-wide `Error` type and its JSON error envelope
//! - Repository error types shared by every store implementation
//! - The `ValidatedJson` request extractor

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::{Config, StoreBackend};
pub use db::RepositoryError;
pub use error::{error_response, Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;
