//! Team management API handlers
//!
//! Team CRUD and invite-code regeneration. Authorization (member vs.
//! teacher) is enforced by `TeamService`; handlers only check that ids in
//! the body refer to the authenticated user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use classhub_common::ValidatedJson;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::api::middleware::{AuthUser, TeamsState};
use crate::domain::entities::{
    MembershipRole, NewTeam, TeamChanges, TeamStatus, TeamType, TeamWithRole,
};
use crate::domain::error::TeamsError;
use crate::domain::validation::{MAX_TEAM_DESCRIPTION_LEN, MAX_TEAM_NAME_LEN};

/// Request for creating a new team
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = MAX_TEAM_NAME_LEN))]
    pub name: String,

    #[validate(length(max = MAX_TEAM_DESCRIPTION_LEN))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub team_type: Option<TeamType>,

    /// Capacity; omitted means unbounded
    #[validate(range(min = 1))]
    pub max_members: Option<i32>,

    pub organization_id: Uuid,

    /// Must match the authenticated user when present
    pub created_by: Option<Uuid>,
}

/// Request for updating a team. For `description` and `maxMembers`, an
/// explicit `null` clears the value while an absent key leaves it alone.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = MAX_TEAM_NAME_LEN))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(rename = "type")]
    pub team_type: Option<TeamType>,

    pub status: Option<TeamStatus>,

    #[serde(default, deserialize_with = "double_option")]
    pub max_members: Option<Option<i32>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateTeamRequest> for TeamChanges {
    fn from(request: UpdateTeamRequest) -> Self {
        TeamChanges {
            name: request.name,
            description: request.description,
            team_type: request.team_type,
            status: request.status,
            max_members: request.max_members,
        }
    }
}

/// List teams for the current user
///
/// **GET /v1/teams**
pub async fn list_teams(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
) -> ApiResult<Json<Vec<TeamWithRole>>> {
    let teams = state.service.get_user_teams(auth.user_id).await?;
    Ok(Json(teams))
}

/// Create a new team
///
/// **POST /v1/teams**
///
/// The authenticated user becomes the team's teacher and first member.
pub async fn create_team(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamWithRole>)> {
    if !auth.is_self(request.created_by) {
        return Err(TeamsError::Forbidden(
            "Cannot create a team on behalf of another user".to_string(),
        ));
    }

    let team = state
        .service
        .create_team(NewTeam {
            name: request.name,
            description: request.description,
            team_type: request.team_type,
            max_members: request.max_members,
            organization_id: request.organization_id,
            created_by: auth.user_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamWithRole {
            team,
            user_role: MembershipRole::Teacher,
        }),
    ))
}

/// Get team details
///
/// **GET /v1/teams/{id}**
///
/// Teams the user does not belong to are reported as not found.
pub async fn get_team(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<TeamWithRole>> {
    let team = state
        .service
        .get_team_by_id(team_id, auth.user_id)
        .await?
        .ok_or(TeamsError::TeamNotFound)?;

    Ok(Json(team))
}

/// Update team settings
///
/// **PATCH /v1/teams/{id}**
///
/// Teacher only.
pub async fn update_team(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTeamRequest>,
) -> ApiResult<Json<TeamWithRole>> {
    let updated = state
        .service
        .update_team(team_id, auth.user_id, request.into())
        .await?;

    Ok(Json(updated))
}

/// Delete a team and all of its memberships
///
/// **DELETE /v1/teams/{id}**
///
/// Teacher only.
pub async fn delete_team(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.service.delete_team(team_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the team's invite code
///
/// **POST /v1/teams/{id}/invite-code**
///
/// Teacher only. The previous code stops working immediately.
pub async fn regenerate_invite_code(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<TeamWithRole>> {
    let team = state
        .service
        .regenerate_invite_code(team_id, auth.user_id)
        .await?;

    Ok(Json(team))
}
