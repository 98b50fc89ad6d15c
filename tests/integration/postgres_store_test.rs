//! Postgres team store integration tests
//!
//! Require a disposable database:
//!
//! ```text
//! TEST_DATABASE_URL=postgres://... cargo test -p classhub-integration-tests \
//!     --test postgres_store_test -- --ignored
//! ```

#![allow(dead_code)]

mod common;

use std::sync::Arc;

use classhub_teams::{
    InviteCode, NewTeam, PgTeamStore, TeamChanges, TeamService, TeamStore, TeamsError,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::TestConfig;

async fn connect() -> PgPool {
    let url = TestConfig::from_env()
        .database_url
        .expect("TEST_DATABASE_URL must be set for Postgres tests");
    let pool = PgPool::connect(&url).await.expect("failed to connect");
    PgTeamStore::migrate(&pool).await.expect("migrations failed");
    pool
}

fn service(pool: &PgPool) -> TeamService {
    TeamService::new(Arc::new(PgTeamStore::new(pool.clone())))
}

fn new_team(created_by: Uuid, max_members: Option<i32>) -> NewTeam {
    NewTeam {
        name: format!("PG Team {}", &Uuid::new_v4().simple().to_string()[..8]),
        description: None,
        team_type: None,
        max_members,
        organization_id: Uuid::new_v4(),
        created_by,
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_create_and_join_round_trip() {
    let pool = connect().await;
    let service = service(&pool);
    let teacher = Uuid::new_v4();
    let student = Uuid::new_v4();

    let team = service.create_team(new_team(teacher, Some(2))).await.unwrap();
    assert_eq!(team.member_count, 1);

    let joined = service
        .join_team_by_invite_code(&team.invite_code.as_str().to_lowercase(), student)
        .await
        .unwrap();
    assert_eq!(joined.member_count, 2);

    let again = service
        .join_team_by_invite_code(team.invite_code.as_str(), student)
        .await;
    assert!(matches!(again, Err(TeamsError::AlreadyMember)));

    let full = service
        .join_team_by_invite_code(team.invite_code.as_str(), Uuid::new_v4())
        .await;
    assert!(matches!(full, Err(TeamsError::TeamFull)));

    let teams = service.get_user_teams(student).await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].team.member_count, 2);

    service.delete_team(team.id, teacher).await.unwrap();
    assert!(service.store().list_members(team.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_duplicate_invite_code_is_rejected_by_store() {
    let pool = connect().await;
    let store = PgTeamStore::new(pool.clone());
    let service = service(&pool);

    let existing = service
        .create_team(new_team(Uuid::new_v4(), None))
        .await
        .unwrap();
    let clash = service
        .create_team(new_team(Uuid::new_v4(), None))
        .await
        .unwrap();

    let taken: InviteCode = existing.invite_code.clone();
    let result = store.replace_invite_code(clash.id, &taken).await;
    assert!(matches!(
        result,
        Err(classhub_common::RepositoryError::AlreadyExists)
    ));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_update_cannot_shrink_below_members() {
    let pool = connect().await;
    let service = service(&pool);
    let teacher = Uuid::new_v4();

    let team = service.create_team(new_team(teacher, None)).await.unwrap();
    service
        .join_team_by_invite_code(team.invite_code.as_str(), Uuid::new_v4())
        .await
        .unwrap();

    let result = service
        .update_team(
            team.id,
            teacher,
            TeamChanges {
                max_members: Some(Some(1)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(TeamsError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_concurrent_joins_never_exceed_capacity() {
    const CAPACITY: i32 = 4;
    const JOINERS: usize = 24;

    let pool = connect().await;
    let service = service(&pool);
    let team = service
        .create_team(new_team(Uuid::new_v4(), Some(CAPACITY)))
        .await
        .unwrap();

    let handles: Vec<_> = (0..JOINERS)
        .map(|_| {
            let service = service.clone();
            let code = team.invite_code.to_string();
            tokio::spawn(async move {
                service
                    .join_team_by_invite_code(&code, Uuid::new_v4())
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(TeamsError::TeamFull) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(admitted, (CAPACITY - 1) as usize);

    let stored = service
        .store()
        .find_team_by_id(team.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.member_count, CAPACITY);
    assert_eq!(
        service.store().list_members(team.id).await.unwrap().len(),
        CAPACITY as usize
    );
}
