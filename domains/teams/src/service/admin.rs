//! Team Admin API: create, read, edit, re-key and delete teams

use classhub_common::RepositoryError;
use tracing::{info, warn};
use uuid::Uuid;

use super::TeamService;
use crate::domain::entities::{
    Membership, MembershipRole, NewTeam, Team, TeamChanges, TeamWithRole,
};
use crate::domain::error::TeamsError;
use crate::repository::UpdateOutcome;

/// How many freshly generated codes to try before giving up on a collision
pub const MAX_INVITE_CODE_ATTEMPTS: u32 = 5;

impl TeamService {
    /// Create a team owned by `new_team.created_by`.
    ///
    /// The creator becomes the team's teacher and its first member. Input is
    /// validated before the store is touched.
    pub async fn create_team(&self, new_team: NewTeam) -> Result<Team, TeamsError> {
        let mut team = Team::new(new_team, (self.generate_code)())?;
        let creator = Membership::new(team.id, team.created_by, MembershipRole::Teacher);

        for attempt in 1..=MAX_INVITE_CODE_ATTEMPTS {
            match self.store.create_team(&team, &creator).await {
                Ok(created) => {
                    info!(
                        team_id = %created.id,
                        user_id = %created.created_by,
                        invite_code = %created.invite_code,
                        "Team created"
                    );
                    return Ok(created);
                }
                Err(RepositoryError::AlreadyExists) => {
                    warn!(attempt, invite_code = %team.invite_code, "Invite code collision");
                    team.invite_code = (self.generate_code)();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TeamsError::InviteCodeExhausted(MAX_INVITE_CODE_ATTEMPTS))
    }

    /// All teams the user belongs to, with the user's role in each
    pub async fn get_user_teams(&self, user_id: Uuid) -> Result<Vec<TeamWithRole>, TeamsError> {
        Ok(self.store.list_teams_for_user(user_id).await?)
    }

    /// A team visible to `user_id`; `None` when it does not exist or the
    /// user is not a member
    pub async fn get_team_by_id(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamWithRole>, TeamsError> {
        let Some(membership) = self.store.find_membership(team_id, user_id).await? else {
            return Ok(None);
        };

        let team = self.store.find_team_by_id(team_id).await?;
        Ok(team.map(|team| TeamWithRole {
            team,
            user_role: membership.role,
        }))
    }

    pub async fn update_team(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        changes: TeamChanges,
    ) -> Result<TeamWithRole, TeamsError> {
        if changes.is_empty() {
            return Err(TeamsError::Validation("No changes provided".to_string()));
        }
        changes.validate()?;

        let membership = self.require_teacher(team_id, user_id).await?;

        match self.store.update_team(team_id, &changes).await? {
            UpdateOutcome::Updated(team) => {
                info!(team_id = %team_id, user_id = %user_id, "Team updated");
                Ok(TeamWithRole {
                    team,
                    user_role: membership.role,
                })
            }
            UpdateOutcome::CapacityBelowMembers { member_count } => {
                Err(TeamsError::Validation(format!(
                    "Max members cannot be lower than the current member count ({member_count})"
                )))
            }
            UpdateOutcome::TeamMissing => Err(TeamsError::TeamNotFound),
        }
    }

    pub async fn delete_team(&self, team_id: Uuid, user_id: Uuid) -> Result<(), TeamsError> {
        self.require_teacher(team_id, user_id).await?;

        if !self.store.delete_team(team_id).await? {
            return Err(TeamsError::TeamNotFound);
        }

        info!(team_id = %team_id, user_id = %user_id, "Team deleted");
        Ok(())
    }

    /// Issue a new invite code. The old code stops resolving immediately.
    pub async fn regenerate_invite_code(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamWithRole, TeamsError> {
        let membership = self.require_teacher(team_id, user_id).await?;

        for attempt in 1..=MAX_INVITE_CODE_ATTEMPTS {
            let code = (self.generate_code)();
            match self.store.replace_invite_code(team_id, &code).await {
                Ok(Some(team)) => {
                    info!(team_id = %team_id, invite_code = %code, "Invite code regenerated");
                    return Ok(TeamWithRole {
                        team,
                        user_role: membership.role,
                    });
                }
                Ok(None) => return Err(TeamsError::TeamNotFound),
                Err(RepositoryError::AlreadyExists) => {
                    warn!(attempt, invite_code = %code, "Invite code collision");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TeamsError::InviteCodeExhausted(MAX_INVITE_CODE_ATTEMPTS))
    }

    /// Members of a team; only visible to its members
    pub async fn list_members(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Membership>, TeamsError> {
        self.require_membership(team_id, user_id).await?;
        Ok(self.store.list_members(team_id).await?)
    }
}
