//! Teams domain state and auth backend integration

use axum::extract::FromRef;
use classhub_auth::AuthBackend;

use crate::service::TeamService;

pub use classhub_auth::AuthUser;

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub service: TeamService,
    pub auth: AuthBackend,
}

impl TeamsState {
    pub fn new(service: TeamService, auth: AuthBackend) -> Self {
        Self { service, auth }
    }
}

impl FromRef<TeamsState> for AuthBackend {
    fn from_ref(state: &TeamsState) -> Self {
        state.auth.clone()
    }
}
