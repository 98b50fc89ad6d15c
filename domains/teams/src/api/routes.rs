//! Route definitions for Teams domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{join, memberships, teams};
use super::middleware::TeamsState;

/// Create team management routes
fn team_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/v1/teams/{id}",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/v1/teams/{id}/invite-code",
            post(teams::regenerate_invite_code),
        )
}

/// Create team membership routes
fn membership_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/teams/join", post(join::join_team))
        .route(
            "/v1/teams/{team_id}/members",
            get(memberships::list_members),
        )
}

/// Create all Teams domain API routes
pub fn routes() -> Router<TeamsState> {
    Router::new()
        .merge(team_routes())
        .merge(membership_routes())
}
