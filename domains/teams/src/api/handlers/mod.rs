//! HTTP handlers for the Teams domain

pub mod join;
pub mod memberships;
pub mod teams;

use crate::domain::error::TeamsError;

/// Handler result; domain errors render with their own status and code
pub type ApiResult<T> = std::result::Result<T, TeamsError>;
