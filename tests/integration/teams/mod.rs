//! Team management endpoint integration tests
//!
//! - POST /v1/teams - Create team
//! - GET /v1/teams - List my teams
//! - GET /v1/teams/{id} - Get team
//! - PATCH /v1/teams/{id} - Update team
//! - DELETE /v1/teams/{id} - Delete team
//! - POST /v1/teams/{id}/invite-code - Regenerate invite code

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::{assertions, TestApp};

mod test_create_team {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_creator_becomes_teacher_and_first_member() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();

        let team = app.create_team(teacher, Some(30)).await;

        assert_eq!(team["memberCount"], 1);
        assert_eq!(team["maxMembers"], 30);
        assert_eq!(team["userRole"], "teacher");
        assert_eq!(team["createdBy"], teacher.to_string());
        assert_eq!(team["status"], "active");

        let code = assertions::invite_code(&team);
        assert_eq!(code.len(), 6);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_missing_max_members_means_unbounded() {
        let app = TestApp::new();
        let team = app.create_team(Uuid::new_v4(), None).await;
        assert!(team["maxMembers"].is_null());
        assert_eq!(team["type"], "class");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_storing() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();

        for body in [
            json!({ "name": "", "organizationId": Uuid::new_v4() }),
            json!({ "name": "Art", "maxMembers": 0, "organizationId": Uuid::new_v4() }),
            json!({ "name": "Art", "type": "guild", "organizationId": Uuid::new_v4() }),
            json!({ "name": "Art" }),
        ] {
            let (status, error) = app
                .request(Method::POST, "/v1/teams", Some(teacher), Some(body))
                .await;
            assertions::assert_error(status, &error, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        }

        let (_, teams) = app.request(Method::GET, "/v1/teams", Some(teacher), None).await;
        assert_eq!(teams, json!([]));
    }

    #[tokio::test]
    async fn test_created_by_must_be_the_caller() {
        let app = TestApp::new();
        let caller = Uuid::new_v4();

        let (status, error) = app
            .request(
                Method::POST,
                "/v1/teams",
                Some(caller),
                Some(json!({
                    "name": "Band",
                    "organizationId": Uuid::new_v4(),
                    "createdBy": Uuid::new_v4(),
                })),
            )
            .await;
        assertions::assert_error(status, &error, StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR");

        let (status, _) = app
            .request(
                Method::POST,
                "/v1/teams",
                Some(caller),
                Some(json!({
                    "name": "Band",
                    "organizationId": Uuid::new_v4(),
                    "createdBy": caller,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = TestApp::new();
        let (status, error) = app
            .request(
                Method::POST,
                "/v1/teams",
                None,
                Some(json!({ "name": "Band", "organizationId": Uuid::new_v4() })),
            )
            .await;
        assertions::assert_error(
            status,
            &error,
            StatusCode::UNAUTHORIZED,
            "MISSING_AUTHORIZATION",
        );
    }
}

mod test_list_and_get_team {
    use super::*;

    #[tokio::test]
    async fn test_list_returns_only_my_teams_with_roles() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let student = Uuid::new_v4();

        let team = app.create_team(teacher, None).await;
        app.create_team(Uuid::new_v4(), None).await;
        let (status, _) = app.join(student, &assertions::invite_code(&team)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, teams) = app.request(Method::GET, "/v1/teams", Some(student), None).await;
        assert_eq!(status, StatusCode::OK);
        let teams = teams.as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["id"], team["id"]);
        assert_eq!(teams[0]["userRole"], "member");
        assert_eq!(teams[0]["memberCount"], 2);
    }

    #[tokio::test]
    async fn test_get_team_is_hidden_from_non_members() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let team = app.create_team(teacher, None).await;
        let uri = format!("/v1/teams/{}", team["id"].as_str().unwrap());

        let (status, found) = app.request(Method::GET, &uri, Some(teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["id"], team["id"]);
        assert_eq!(found["userRole"], "teacher");

        let (status, error) = app
            .request(Method::GET, &uri, Some(Uuid::new_v4()), None)
            .await;
        assertions::assert_error(status, &error, StatusCode::NOT_FOUND, "NOT_FOUND");

        let missing = format!("/v1/teams/{}", Uuid::new_v4());
        let (status, _) = app.request(Method::GET, &missing, Some(teacher), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod test_update_team {
    use super::*;

    #[tokio::test]
    async fn test_teacher_can_edit_and_clear_fields() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let team = app.create_team(teacher, Some(10)).await;
        let uri = format!("/v1/teams/{}", team["id"].as_str().unwrap());

        let (status, updated) = app
            .request(
                Method::PATCH,
                &uri,
                Some(teacher),
                Some(json!({
                    "name": "Advanced Rust",
                    "description": null,
                    "type": "study-group",
                    "maxMembers": null,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["name"], "Advanced Rust");
        assert!(updated["description"].is_null());
        assert_eq!(updated["type"], "study-group");
        assert!(updated["maxMembers"].is_null());
        assert_eq!(updated["inviteCode"], team["inviteCode"]);
    }

    #[tokio::test]
    async fn test_members_cannot_edit() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let student = Uuid::new_v4();
        let team = app.create_team(teacher, None).await;
        app.join(student, &assertions::invite_code(&team)).await;
        let uri = format!("/v1/teams/{}", team["id"].as_str().unwrap());

        let (status, error) = app
            .request(Method::PATCH, &uri, Some(student), Some(json!({ "name": "Mine" })))
            .await;
        assertions::assert_error(status, &error, StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR");
    }

    #[tokio::test]
    async fn test_capacity_cannot_drop_below_member_count() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let team = app.create_team(teacher, None).await;
        app.join(Uuid::new_v4(), &assertions::invite_code(&team)).await;
        let uri = format!("/v1/teams/{}", team["id"].as_str().unwrap());

        let (status, error) = app
            .request(Method::PATCH, &uri, Some(teacher), Some(json!({ "maxMembers": 1 })))
            .await;
        assertions::assert_error(status, &error, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

        let (status, _) = app
            .request(Method::PATCH, &uri, Some(teacher), Some(json!({ "maxMembers": 2 })))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

mod test_delete_team {
    use super::*;

    #[tokio::test]
    async fn test_teacher_deletes_team_and_code_stops_working() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let student = Uuid::new_v4();
        let team = app.create_team(teacher, None).await;
        let code = assertions::invite_code(&team);
        app.join(student, &code).await;
        let uri = format!("/v1/teams/{}", team["id"].as_str().unwrap());

        let (status, _) = app.request(Method::DELETE, &uri, Some(student), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.request(Method::DELETE, &uri, Some(teacher), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (_, teams) = app.request(Method::GET, "/v1/teams", Some(student), None).await;
        assert_eq!(teams, json!([]));

        let (status, error) = app.join(Uuid::new_v4(), &code).await;
        assertions::assert_error(status, &error, StatusCode::NOT_FOUND, "INVALID_INVITE_CODE");
    }
}

mod test_regenerate_invite_code {
    use super::*;

    #[tokio::test]
    async fn test_teacher_gets_a_new_code() {
        let app = TestApp::new();
        let teacher = Uuid::new_v4();
        let team = app.create_team(teacher, None).await;
        let old_code = assertions::invite_code(&team);
        let uri = format!("/v1/teams/{}/invite-code", team["id"].as_str().unwrap());

        let (status, _) = app
            .request(Method::POST, &uri, Some(Uuid::new_v4()), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, rekeyed) = app.request(Method::POST, &uri, Some(teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        let new_code = assertions::invite_code(&rekeyed);
        assert_eq!(new_code.len(), 6);

        // A fresh draw can repeat the old code (1 in 36^6); only check when it differs
        if new_code != old_code {
            let (status, _) = app.join(Uuid::new_v4(), &old_code).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        let (status, _) = app.join(Uuid::new_v4(), &new_code).await;
        assert_eq!(status, StatusCode::OK);
    }
}
