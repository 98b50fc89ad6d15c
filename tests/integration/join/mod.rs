//! Invite-code redemption endpoint integration tests
//!
//! - POST /v1/teams/join

use axum::http::{Method, StatusCode};
use classhub_teams::TeamStore;
use serde_json::json;
use uuid::Uuid;

use crate::common::{assertions, TestApp};

fn team_id(team: &serde_json::Value) -> Uuid {
    team["id"].as_str().unwrap().parse().unwrap()
}

#[test_log::test(tokio::test)]
async fn test_join_returns_team_with_new_count() {
    let app = TestApp::new();
    let team = app.create_team(Uuid::new_v4(), None).await;

    let (status, joined) = app.join(Uuid::new_v4(), &assertions::invite_code(&team)).await;

    assert_eq!(status, StatusCode::OK, "{joined}");
    assert_eq!(joined["id"], team["id"]);
    assert_eq!(joined["memberCount"], 2);
    assert_eq!(joined["userRole"], "member");
}

#[tokio::test]
async fn test_join_accepts_any_case() {
    let app = TestApp::new();
    let team = app.create_team(Uuid::new_v4(), None).await;
    let lowercase = assertions::invite_code(&team).to_lowercase();

    let (status, joined) = app.join(Uuid::new_v4(), &lowercase).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["id"], team["id"]);
}

#[tokio::test]
async fn test_unknown_code_is_invalid() {
    let app = TestApp::new();
    let team = app.create_team(Uuid::new_v4(), None).await;
    let unknown = if assertions::invite_code(&team) == "ZZZZZZ" {
        "YYYYYY"
    } else {
        "ZZZZZZ"
    };

    let (status, error) = app.join(Uuid::new_v4(), unknown).await;
    assertions::assert_error(status, &error, StatusCode::NOT_FOUND, "INVALID_INVITE_CODE");

    let (status, error) = app.join(Uuid::new_v4(), "bad code!").await;
    assertions::assert_error(status, &error, StatusCode::NOT_FOUND, "INVALID_INVITE_CODE");
}

#[tokio::test]
async fn test_empty_blank_and_overlong_codes_are_invalid() {
    let app = TestApp::new();
    let team = app.create_team(Uuid::new_v4(), None).await;
    let overlong = format!("{}-PASTED-WITH-TRAILING-TEXT", assertions::invite_code(&team));

    for code in ["", "   ", "THIS-IS-A-VERY-LONG-PASTED-INVITE-CODE-XYZ", &overlong] {
        let (status, error) = app.join(Uuid::new_v4(), code).await;
        assertions::assert_error(status, &error, StatusCode::NOT_FOUND, "INVALID_INVITE_CODE");
    }
    assert_eq!(app.store.membership_count(team_id(&team)).await, 1);
}

#[tokio::test]
async fn test_capacity_of_two_end_to_end() {
    let app = TestApp::new();
    let teacher = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let user_c = Uuid::new_v4();
    let team = app.create_team(teacher, Some(2)).await;
    let code = assertions::invite_code(&team);

    let (status, joined) = app.join(user_b, &code).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["memberCount"], 2);

    let (status, error) = app.join(user_c, &code).await;
    assertions::assert_error(status, &error, StatusCode::CONFLICT, "TEAM_FULL");
    assert_eq!(error["error"]["message"], "Team has reached maximum capacity");

    let (status, error) = app.join(user_b, &code).await;
    assertions::assert_error(status, &error, StatusCode::CONFLICT, "ALREADY_MEMBER");
    assert_eq!(
        error["error"]["message"],
        "You are already a member of this team"
    );

    let stored = app
        .store
        .find_team_by_id(team_id(&team))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.member_count, 2);
    assert_eq!(app.store.membership_count(stored.id).await, 2);
}

#[tokio::test]
async fn test_user_id_must_be_the_caller() {
    let app = TestApp::new();
    let team = app.create_team(Uuid::new_v4(), None).await;
    let caller = Uuid::new_v4();

    let (status, error) = app
        .request(
            Method::POST,
            "/v1/teams/join",
            Some(caller),
            Some(json!({
                "inviteCode": assertions::invite_code(&team),
                "userId": Uuid::new_v4(),
            })),
        )
        .await;
    assertions::assert_error(status, &error, StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR");
    assert_eq!(app.store.membership_count(team_id(&team)).await, 1);

    let (status, _) = app
        .request(
            Method::POST,
            "/v1/teams/join",
            Some(caller),
            Some(json!({
                "inviteCode": assertions::invite_code(&team),
                "userId": caller,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_join_requires_valid_token() {
    let app = TestApp::new();

    let (status, error) = app
        .request(
            Method::POST,
            "/v1/teams/join",
            None,
            Some(json!({ "inviteCode": "ABC123" })),
        )
        .await;
    assertions::assert_error(
        status,
        &error,
        StatusCode::UNAUTHORIZED,
        "MISSING_AUTHORIZATION",
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_http_joins_respect_capacity() {
    let app = std::sync::Arc::new(TestApp::new());
    let team = app.create_team(Uuid::new_v4(), Some(3)).await;
    let code = assertions::invite_code(&team);

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let app = app.clone();
            let code = code.clone();
            tokio::spawn(async move { app.join(Uuid::new_v4(), &code).await.0 })
        })
        .collect();

    let mut ok = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => full += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 2);
    assert_eq!(full, 10);
    assert_eq!(app.store.membership_count(team_id(&team)).await, 3);
}
