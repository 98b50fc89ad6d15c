//! Join Coordinator: redeem an invite code for a membership

use tracing::{info, warn};
use uuid::Uuid;

use super::TeamService;
use crate::domain::entities::{Membership, MembershipRole, Team};
use crate::domain::error::TeamsError;
use crate::domain::invite_code::InviteCode;
use crate::domain::state::{AdmissionEvent, AdmissionState, AdmissionStateMachine};
use crate::repository::AdmitOutcome;

impl TeamService {
    /// Admit `user_id` to the team behind `invite_code`.
    ///
    /// The code is matched case-insensitively. On success the returned team
    /// already reflects the new member. Any failure leaves the store as it
    /// was: no membership row and no counter change.
    pub async fn join_team_by_invite_code(
        &self,
        invite_code: &str,
        user_id: Uuid,
    ) -> Result<Team, TeamsError> {
        let pending = AdmissionStateMachine::transition(
            AdmissionState::NoMembership,
            AdmissionEvent::SubmitCode,
        )?;

        match self.validate_and_admit(invite_code, user_id).await {
            Ok(team) => {
                AdmissionStateMachine::transition(pending, AdmissionEvent::Admit)?;
                info!(
                    team_id = %team.id,
                    user_id = %user_id,
                    member_count = team.member_count,
                    "User joined team"
                );
                Ok(team)
            }
            Err(error) => {
                AdmissionStateMachine::transition(pending, AdmissionEvent::Reject)?;
                if error.status_code().is_client_error() {
                    warn!(user_id = %user_id, error = %error, "Join rejected");
                }
                Err(error)
            }
        }
    }

    async fn validate_and_admit(&self, invite_code: &str, user_id: Uuid) -> Result<Team, TeamsError> {
        // A malformed code cannot match any stored code
        let code = InviteCode::parse(invite_code)?;

        let team = self
            .store
            .find_team_by_invite_code(&code)
            .await?
            .ok_or(TeamsError::InvalidInviteCode)?;

        if self.store.find_membership(team.id, user_id).await?.is_some() {
            return Err(TeamsError::AlreadyMember);
        }

        if team.is_full() {
            return Err(TeamsError::TeamFull);
        }

        // The checks above are advisory; the store re-checks both atomically
        let membership = Membership::new(team.id, user_id, MembershipRole::Member);
        match self.store.admit_member(&membership).await? {
            AdmitOutcome::Admitted(team) => {
                debug_assert!(team.validate().is_ok(), "admitted team breaks capacity");
                Ok(team)
            }
            AdmitOutcome::AlreadyMember => Err(TeamsError::AlreadyMember),
            AdmitOutcome::TeamFull => Err(TeamsError::TeamFull),
            AdmitOutcome::TeamMissing => Err(TeamsError::InvalidInviteCode),
        }
    }
}
