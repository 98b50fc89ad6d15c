//! Admission state machine for a (team, user) pair
//!
//! - `NoMembership`: the user holds no membership in the team
//! - `PendingValidation`: an invite code was submitted and is being checked
//! - `Member`: the user was admitted
//!
//! The only way into `Member` is a successful redemption. Leaving a team is
//! not modelled, so `Member` is terminal.

use classhub_common::StateError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdmissionState {
    NoMembership,
    PendingValidation,
    Member,
}

impl AdmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Member)
    }
}

impl std::fmt::Display for AdmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMembership => write!(f, "no-membership"),
            Self::PendingValidation => write!(f, "pending-validation"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Events that drive admission
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdmissionEvent {
    /// An invite code was submitted for redemption
    SubmitCode,
    /// All checks passed and the membership was persisted
    Admit,
    /// A check failed; nothing was persisted
    Reject,
}

impl std::fmt::Display for AdmissionEvent {
    #[mutants::skip] // Only feeds error text
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmitCode => write!(f, "submit-code"),
            Self::Admit => write!(f, "admit"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

pub struct AdmissionStateMachine;

impl AdmissionStateMachine {
    pub fn transition(
        current: AdmissionState,
        event: AdmissionEvent,
    ) -> Result<AdmissionState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        match (current, event) {
            (AdmissionState::NoMembership, AdmissionEvent::SubmitCode) => {
                Ok(AdmissionState::PendingValidation)
            }
            (AdmissionState::PendingValidation, AdmissionEvent::Admit) => {
                Ok(AdmissionState::Member)
            }
            (AdmissionState::PendingValidation, AdmissionEvent::Reject) => {
                Ok(AdmissionState::NoMembership)
            }
            _ => Err(StateError::InvalidTransition {
                from: current.to_string(),
                event: event.to_string(),
            }),
        }
    }
}
