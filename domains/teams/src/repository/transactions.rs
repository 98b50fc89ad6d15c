//! Transactional free functions for the teams domain (Zero2Prod pattern)
//!
//! Each function runs inside a caller-owned transaction; the caller decides
//! when to commit. Dropping the transaction without commit rolls back.

use crate::domain::entities::{Membership, Team};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Insert a team within an existing transaction.
pub async fn insert_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team: &Team,
) -> std::result::Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(concat!(
        "INSERT INTO teams (",
        team_columns!(),
        ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING ",
        team_columns!()
    ))
    .bind(team.id)
    .bind(&team.name)
    .bind(&team.description)
    .bind(team.team_type)
    .bind(team.status)
    .bind(team.member_count)
    .bind(team.max_members)
    .bind(&team.invite_code)
    .bind(team.organization_id)
    .bind(team.created_by)
    .bind(team.created_at)
    .bind(team.updated_at)
    .fetch_one(&mut **transaction)
    .await
}

/// Insert a membership within an existing transaction.
///
/// Returns `None` when `(team_id, user_id)` already exists. A concurrent
/// insert of the same pair waits on the unique index and then takes this
/// path, so duplicate joins never produce two rows.
pub async fn insert_membership_tx(
    transaction: &mut Transaction<'_, Postgres>,
    membership: &Membership,
) -> std::result::Result<Option<Membership>, sqlx::Error> {
    sqlx::query_as::<_, Membership>(
        r#"
        INSERT INTO team_members (id, team_id, user_id, role, joined_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (team_id, user_id) DO NOTHING
        RETURNING id, team_id, user_id, role, joined_at
        "#,
    )
    .bind(membership.id)
    .bind(membership.team_id)
    .bind(membership.user_id)
    .bind(membership.role)
    .bind(membership.joined_at)
    .fetch_optional(&mut **transaction)
    .await
}

/// Increment a team's member count within an existing transaction, only if
/// the team has room.
///
/// The capacity check and the increment are one conditional `UPDATE`, so
/// concurrent joins serialize on the team row and re-check the predicate
/// against the committed count. Returns `None` when the team is full or
/// missing.
pub async fn increment_member_count_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> std::result::Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(concat!(
        r#"
        UPDATE teams
        SET member_count = member_count + 1, updated_at = NOW()
        WHERE id = $1 AND (max_members IS NULL OR member_count < max_members)
        RETURNING "#,
        team_columns!()
    ))
    .bind(team_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Load a team and hold its row lock until the transaction ends.
pub async fn lock_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> std::result::Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(concat!(
        "SELECT ",
        team_columns!(),
        " FROM teams WHERE id = $1 FOR UPDATE"
    ))
    .bind(team_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Write back the editable columns of a team within an existing transaction.
pub async fn update_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team: &Team,
) -> std::result::Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(concat!(
        r#"
        UPDATE teams
        SET name = $2, description = $3, team_type = $4, status = $5,
            max_members = $6, updated_at = $7
        WHERE id = $1
        RETURNING "#,
        team_columns!()
    ))
    .bind(team.id)
    .bind(&team.name)
    .bind(&team.description)
    .bind(team.team_type)
    .bind(team.status)
    .bind(team.max_members)
    .bind(team.updated_at)
    .fetch_one(&mut **transaction)
    .await
}
