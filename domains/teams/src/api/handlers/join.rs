//! Invite-code redemption handler

use axum::{extract::State, Json};
use classhub_common::ValidatedJson;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::api::middleware::{AuthUser, TeamsState};
use crate::domain::entities::{MembershipRole, TeamWithRole};
use crate::domain::error::TeamsError;

/// Request for joining a team with an invite code
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    /// Code as typed by the user; case and surrounding whitespace are ignored.
    /// Any string is accepted here and anything that matches no team is an
    /// invalid code.
    pub invite_code: String,

    /// Must match the authenticated user when present
    pub user_id: Option<Uuid>,
}

/// Join a team
///
/// **POST /v1/teams/join**
///
/// Returns the team with the new member already counted.
pub async fn join_team(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<JoinTeamRequest>,
) -> ApiResult<Json<TeamWithRole>> {
    if !auth.is_self(request.user_id) {
        return Err(TeamsError::Forbidden(
            "Cannot join a team on behalf of another user".to_string(),
        ));
    }

    let team = state
        .service
        .join_team_by_invite_code(&request.invite_code, auth.user_id)
        .await?;

    Ok(Json(TeamWithRole {
        team,
        user_role: MembershipRole::Member,
    }))
}
