//! Teams domain: invite codes, membership admission, team administration

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::error::TeamsError;
pub use domain::invite_code::{generate_invite_code, InviteCode};
pub use domain::state::{AdmissionEvent, AdmissionState, AdmissionStateMachine};

// Re-export repository types
pub use repository::{
    AdmitOutcome, InMemoryTeamStore, PgTeamStore, TeamStore, UpdateOutcome,
};

// Re-export the coordinator and admin API
pub use service::{CodeGenerator, TeamService, MAX_INVITE_CODE_ATTEMPTS};

// Re-export API types
pub use api::routes;
pub use api::TeamsState;
