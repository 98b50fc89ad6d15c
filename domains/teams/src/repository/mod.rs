//! Team Store: persistence contract for teams and memberships
//!
//! `PgTeamStore` is the production backend; `InMemoryTeamStore` backs tests
//! and local runs without a database. Both honor the same atomicity rules:
//! a membership insert and its counter increment land together or not at all.

/// Column list matching `Team`'s `FromRow` layout
macro_rules! team_columns {
    () => {
        "id, name, description, team_type, status, member_count, max_members, \
         invite_code, organization_id, created_by, created_at, updated_at"
    };
}

pub mod memory;
pub mod postgres;
pub mod transactions;

use async_trait::async_trait;
use classhub_common::RepositoryError;
use uuid::Uuid;

use crate::domain::entities::{Membership, Team, TeamChanges, TeamWithRole};
use crate::domain::invite_code::InviteCode;

pub use memory::InMemoryTeamStore;
pub use postgres::PgTeamStore;
pub use transactions::{
    increment_member_count_tx, insert_membership_tx, insert_team_tx, lock_team_tx,
    update_team_tx,
};

type StoreResult<T> = std::result::Result<T, RepositoryError>;

/// Result of the atomic admission step
#[derive(Debug, Clone, PartialEq)]
pub enum AdmitOutcome {
    /// Membership inserted and counter incremented; carries the updated team
    Admitted(Team),
    /// `(team_id, user_id)` already exists; nothing written
    AlreadyMember,
    /// Capacity reached; nothing written
    TeamFull,
    /// The team disappeared (deleted concurrently); nothing written
    TeamMissing,
}

/// Result of an admin edit
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Team),
    /// The requested capacity is below the current member count
    CapacityBelowMembers { member_count: i32 },
    TeamMissing,
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Look up a team by its (already normalized) invite code
    async fn find_team_by_invite_code(&self, code: &InviteCode) -> StoreResult<Option<Team>>;

    async fn find_team_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>>;

    async fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>>;

    /// Insert a team and its creator membership together.
    /// Fails with `RepositoryError::AlreadyExists` when the invite code is taken.
    async fn create_team(&self, team: &Team, creator: &Membership) -> StoreResult<Team>;

    /// Insert `membership` and increment the team's member count (bumping
    /// `updated_at`) as one atomic step, only if the team has room.
    async fn admit_member(&self, membership: &Membership) -> StoreResult<AdmitOutcome>;

    /// Teams the user belongs to, with the user's role, ordered by name
    async fn list_teams_for_user(&self, user_id: Uuid) -> StoreResult<Vec<TeamWithRole>>;

    /// Memberships of a team, teacher first, then by join time
    async fn list_members(&self, team_id: Uuid) -> StoreResult<Vec<Membership>>;

    async fn update_team(&self, team_id: Uuid, changes: &TeamChanges)
        -> StoreResult<UpdateOutcome>;

    /// Swap the invite code. `AlreadyExists` when the new code is taken.
    async fn replace_invite_code(
        &self,
        team_id: Uuid,
        code: &InviteCode,
    ) -> StoreResult<Option<Team>>;

    /// Delete a team and its memberships. Returns whether a team was removed.
    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool>;
}
