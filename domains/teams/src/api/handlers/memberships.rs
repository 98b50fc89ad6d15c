//! Team membership API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::ApiResult;
use crate::api::middleware::{AuthUser, TeamsState};
use crate::domain::entities::Membership;

/// List members of a team
///
/// **GET /v1/teams/{team_id}/members**
///
/// The teacher comes first, then members in join order. Only members may
/// list a team's members.
pub async fn list_members(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    let members = state.service.list_members(team_id, auth.user_id).await?;
    Ok(Json(members))
}
