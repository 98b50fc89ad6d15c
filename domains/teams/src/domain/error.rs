//! Error taxonomy for the teams domain
//!
//! Each admission failure has its own kind so callers can show a specific
//! message. Store failures pass through unchanged as `Repository` and are
//! never reported as one of the domain kinds.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classhub_common::{error_response, Error, RepositoryError, StateError};

#[derive(Debug, thiserror::Error)]
pub enum TeamsError {
    #[error("Invalid invite code")]
    InvalidInviteCode,

    #[error("You are already a member of this team")]
    AlreadyMember,

    #[error("Team has reached maximum capacity")]
    TeamFull,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Team not found")]
    TeamNotFound,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Could not allocate a unique invite code after {0} attempts")]
    InviteCodeExhausted(u32),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TeamsError {
    /// HTTP status for domain kinds; `None` for infrastructure failures
    fn domain_status(&self) -> Option<(StatusCode, &'static str)> {
        match self {
            TeamsError::InvalidInviteCode => Some((StatusCode::NOT_FOUND, "INVALID_INVITE_CODE")),
            TeamsError::AlreadyMember => Some((StatusCode::CONFLICT, "ALREADY_MEMBER")),
            TeamsError::TeamFull => Some((StatusCode::CONFLICT, "TEAM_FULL")),
            TeamsError::Validation(_) => Some((StatusCode::BAD_REQUEST, "VALIDATION_ERROR")),
            TeamsError::TeamNotFound => Some((StatusCode::NOT_FOUND, "NOT_FOUND")),
            TeamsError::Forbidden(_) => Some((StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR")),
            TeamsError::InviteCodeExhausted(_)
            | TeamsError::State(_)
            | TeamsError::Repository(_) => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.domain_status()
            .map(|(status, _)| status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<TeamsError> for Error {
    fn from(err: TeamsError) -> Self {
        match err {
            TeamsError::Repository(e) => Error::from(e),
            TeamsError::Validation(msg) => Error::Validation(msg),
            TeamsError::TeamNotFound => Error::NotFound(err.to_string()),
            TeamsError::Forbidden(msg) => Error::Authorization(msg),
            TeamsError::AlreadyMember | TeamsError::TeamFull => Error::Conflict(err.to_string()),
            TeamsError::InvalidInviteCode => Error::NotFound(err.to_string()),
            TeamsError::InviteCodeExhausted(_) | TeamsError::State(_) => {
                Error::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for TeamsError {
    fn into_response(self) -> Response {
        match self.domain_status() {
            Some((status, code)) => error_response(status, code, self.to_string()),
            None => Error::from(self).into_response(),
        }
    }
}
