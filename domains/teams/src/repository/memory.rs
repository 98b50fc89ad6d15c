//! In-memory Team Store
//!
//! Keeps every team and membership behind one async mutex, so each trait
//! call is a single critical section. Used by tests and by local runs with
//! `STORE_BACKEND=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use classhub_common::RepositoryError;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AdmitOutcome, StoreResult, TeamStore, UpdateOutcome};
use crate::domain::entities::{Membership, MembershipRole, Team, TeamChanges, TeamWithRole};
use crate::domain::invite_code::InviteCode;

#[derive(Debug, Default)]
struct MemoryState {
    teams: HashMap<Uuid, Team>,
    /// Keyed by `(team_id, user_id)`, which makes the pair unique by construction
    memberships: HashMap<(Uuid, Uuid), Membership>,
}

impl MemoryState {
    fn invite_code_taken(&self, code: &InviteCode, except: Option<Uuid>) -> bool {
        self.teams
            .values()
            .any(|team| &team.invite_code == code && Some(team.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTeamStore {
    state: Mutex<MemoryState>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of membership rows for a team
    pub async fn membership_count(&self, team_id: Uuid) -> usize {
        let state = self.state.lock().await;
        state
            .memberships
            .keys()
            .filter(|(member_team, _)| *member_team == team_id)
            .count()
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn find_team_by_invite_code(&self, code: &InviteCode) -> StoreResult<Option<Team>> {
        let state = self.state.lock().await;
        Ok(state
            .teams
            .values()
            .find(|team| &team.invite_code == code)
            .cloned())
    }

    async fn find_team_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        let state = self.state.lock().await;
        Ok(state.teams.get(&team_id).cloned())
    }

    async fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let state = self.state.lock().await;
        Ok(state.memberships.get(&(team_id, user_id)).cloned())
    }

    async fn create_team(&self, team: &Team, creator: &Membership) -> StoreResult<Team> {
        let mut state = self.state.lock().await;

        if state.teams.contains_key(&team.id) || state.invite_code_taken(&team.invite_code, None)
        {
            return Err(RepositoryError::AlreadyExists);
        }

        state.teams.insert(team.id, team.clone());
        state
            .memberships
            .insert((creator.team_id, creator.user_id), creator.clone());

        Ok(team.clone())
    }

    async fn admit_member(&self, membership: &Membership) -> StoreResult<AdmitOutcome> {
        let mut state = self.state.lock().await;
        let key = (membership.team_id, membership.user_id);

        let Some(team) = state.teams.get(&membership.team_id) else {
            return Ok(AdmitOutcome::TeamMissing);
        };
        if state.memberships.contains_key(&key) {
            return Ok(AdmitOutcome::AlreadyMember);
        }
        if team.is_full() {
            return Ok(AdmitOutcome::TeamFull);
        }

        let mut updated = team.clone();
        updated.member_count += 1;
        updated.updated_at = Utc::now();

        state.memberships.insert(key, membership.clone());
        state.teams.insert(updated.id, updated.clone());

        Ok(AdmitOutcome::Admitted(updated))
    }

    async fn list_teams_for_user(&self, user_id: Uuid) -> StoreResult<Vec<TeamWithRole>> {
        let state = self.state.lock().await;

        let mut teams: Vec<TeamWithRole> = state
            .memberships
            .values()
            .filter(|membership| membership.user_id == user_id)
            .filter_map(|membership| {
                state.teams.get(&membership.team_id).map(|team| TeamWithRole {
                    team: team.clone(),
                    user_role: membership.role,
                })
            })
            .collect();

        teams.sort_by(|a, b| {
            a.team
                .name
                .cmp(&b.team.name)
                .then(a.team.created_at.cmp(&b.team.created_at))
        });
        Ok(teams)
    }

    async fn list_members(&self, team_id: Uuid) -> StoreResult<Vec<Membership>> {
        let state = self.state.lock().await;

        let mut members: Vec<Membership> = state
            .memberships
            .values()
            .filter(|membership| membership.team_id == team_id)
            .cloned()
            .collect();

        members.sort_by_key(|m| (m.role != MembershipRole::Teacher, m.joined_at));
        Ok(members)
    }

    async fn update_team(
        &self,
        team_id: Uuid,
        changes: &TeamChanges,
    ) -> StoreResult<UpdateOutcome> {
        let mut state = self.state.lock().await;

        let Some(team) = state.teams.get(&team_id) else {
            return Ok(UpdateOutcome::TeamMissing);
        };

        let mut updated = team.clone();
        changes.apply(&mut updated);
        if updated.exceeds_capacity() {
            return Ok(UpdateOutcome::CapacityBelowMembers {
                member_count: updated.member_count,
            });
        }

        state.teams.insert(team_id, updated.clone());
        Ok(UpdateOutcome::Updated(updated))
    }

    async fn replace_invite_code(
        &self,
        team_id: Uuid,
        code: &InviteCode,
    ) -> StoreResult<Option<Team>> {
        let mut state = self.state.lock().await;

        if !state.teams.contains_key(&team_id) {
            return Ok(None);
        }
        if state.invite_code_taken(code, Some(team_id)) {
            return Err(RepositoryError::AlreadyExists);
        }

        let updated = state.teams.get_mut(&team_id).map(|team| {
            team.invite_code = code.clone();
            team.updated_at = Utc::now();
            team.clone()
        });
        Ok(updated)
    }

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;

        let removed = state.teams.remove(&team_id).is_some();
        state
            .memberships
            .retain(|(member_team, _), _| *member_team != team_id);

        Ok(removed)
    }
}
