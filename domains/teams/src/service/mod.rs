//! Team service: the Join Coordinator and the Team Admin API
//!
//! Both the HTTP handlers and direct callers go through `TeamService`, so
//! the admission rules live in one place.

mod admin;
mod join;

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Membership, MembershipRole};
use crate::domain::error::TeamsError;
use crate::domain::invite_code::{generate_invite_code, InviteCode};
use crate::repository::TeamStore;

pub use admin::MAX_INVITE_CODE_ATTEMPTS;

/// Source of fresh invite codes
pub type CodeGenerator = Arc<dyn Fn() -> InviteCode + Send + Sync>;

#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn TeamStore>,
    generate_code: CodeGenerator,
}

impl TeamService {
    pub fn new(store: Arc<dyn TeamStore>) -> Self {
        Self {
            store,
            generate_code: Arc::new(generate_invite_code),
        }
    }

    /// Replace the code generator (tests use this to force collisions)
    pub fn with_code_generator(mut self, generate_code: CodeGenerator) -> Self {
        self.generate_code = generate_code;
        self
    }

    pub fn store(&self) -> &Arc<dyn TeamStore> {
        &self.store
    }

    /// Membership of `user_id` in `team_id`; non-members see `TeamNotFound`
    async fn require_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Membership, TeamsError> {
        self.store
            .find_membership(team_id, user_id)
            .await?
            .ok_or(TeamsError::TeamNotFound)
    }

    async fn require_teacher(&self, team_id: Uuid, user_id: Uuid) -> Result<Membership, TeamsError> {
        let membership = self.require_membership(team_id, user_id).await?;
        if !membership.role.can_manage_team() {
            return Err(TeamsError::Forbidden(format!(
                "Only the {} can manage this team",
                MembershipRole::Teacher
            )));
        }
        Ok(membership)
    }
}
