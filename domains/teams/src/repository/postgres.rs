//! Postgres-backed Team Store
//!
//! Uses runtime `sqlx::query_as` (not the compile-time macros) so the crate
//! builds without a live database.

use async_trait::async_trait;
use classhub_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use super::transactions::{
    increment_member_count_tx, insert_membership_tx, insert_team_tx, lock_team_tx,
    update_team_tx,
};
use super::{AdmitOutcome, StoreResult, TeamStore, UpdateOutcome};
use crate::domain::entities::{Membership, Team, TeamChanges, TeamWithRole};
use crate::domain::invite_code::InviteCode;

#[derive(Clone)]
pub struct PgTeamStore {
    pool: PgPool,
}

impl PgTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the teams schema migrations
    pub async fn migrate(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[async_trait]
impl TeamStore for PgTeamStore {
    async fn find_team_by_invite_code(&self, code: &InviteCode) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(concat!(
            "SELECT ",
            team_columns!(),
            " FROM teams WHERE invite_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    async fn find_team_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(concat!(
            "SELECT ",
            team_columns!(),
            " FROM teams WHERE id = $1"
        ))
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    async fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn create_team(&self, team: &Team, creator: &Membership) -> StoreResult<Team> {
        let mut transaction = self.pool.begin().await?;

        let created = insert_team_tx(&mut transaction, team)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        insert_membership_tx(&mut transaction, creator)
            .await?
            .ok_or_else(|| {
                RepositoryError::InvalidData("Creator membership already exists".to_string())
            })?;

        transaction.commit().await?;
        Ok(created)
    }

    async fn admit_member(&self, membership: &Membership) -> StoreResult<AdmitOutcome> {
        let mut transaction = self.pool.begin().await?;

        let inserted = match insert_membership_tx(&mut transaction, membership).await {
            Ok(inserted) => inserted,
            Err(e) if is_foreign_key_violation(&e) => return Ok(AdmitOutcome::TeamMissing),
            Err(e) => return Err(e.into()),
        };

        if inserted.is_none() {
            transaction.rollback().await?;
            return Ok(AdmitOutcome::AlreadyMember);
        }

        match increment_member_count_tx(&mut transaction, membership.team_id).await? {
            Some(team) => {
                transaction.commit().await?;
                Ok(AdmitOutcome::Admitted(team))
            }
            None => {
                // Rolls back the membership insert as well
                transaction.rollback().await?;
                match self.find_team_by_id(membership.team_id).await? {
                    Some(_) => Ok(AdmitOutcome::TeamFull),
                    None => Ok(AdmitOutcome::TeamMissing),
                }
            }
        }
    }

    async fn list_teams_for_user(&self, user_id: Uuid) -> StoreResult<Vec<TeamWithRole>> {
        let teams = sqlx::query_as::<_, TeamWithRole>(
            r#"
            SELECT t.id, t.name, t.description, t.team_type, t.status, t.member_count,
                   t.max_members, t.invite_code, t.organization_id, t.created_by,
                   t.created_at, t.updated_at,
                   m.role AS user_role
            FROM teams t
            INNER JOIN team_members m ON t.id = m.team_id
            WHERE m.user_id = $1
            ORDER BY t.name ASC, t.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn list_members(&self, team_id: Uuid) -> StoreResult<Vec<Membership>> {
        let members = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY
                CASE role
                    WHEN 'teacher' THEN 0
                    WHEN 'member' THEN 1
                END ASC,
                joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn update_team(
        &self,
        team_id: Uuid,
        changes: &TeamChanges,
    ) -> StoreResult<UpdateOutcome> {
        let mut transaction = self.pool.begin().await?;

        // The row lock orders this edit against in-flight joins
        let Some(mut team) = lock_team_tx(&mut transaction, team_id).await? else {
            return Ok(UpdateOutcome::TeamMissing);
        };

        changes.apply(&mut team);
        if team.exceeds_capacity() {
            transaction.rollback().await?;
            return Ok(UpdateOutcome::CapacityBelowMembers {
                member_count: team.member_count,
            });
        }

        let updated = update_team_tx(&mut transaction, &team).await?;
        transaction.commit().await?;

        Ok(UpdateOutcome::Updated(updated))
    }

    async fn replace_invite_code(
        &self,
        team_id: Uuid,
        code: &InviteCode,
    ) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(concat!(
            "UPDATE teams SET invite_code = $2, updated_at = NOW() WHERE id = $1 RETURNING ",
            team_columns!()
        ))
        .bind(team_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(team)
    }

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        // team_members rows go with the team (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
