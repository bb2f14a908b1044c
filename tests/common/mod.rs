#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use parking_booking_backend::{
    entities::user::UserRole,
    middleware::auth::Principal,
    repository::{InMemoryRepository, NewUser},
    utils::date_range::DateRange,
    AppState,
};
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "adminToken1";
pub const USER1_TOKEN: &str = "userToken1";
pub const USER2_TOKEN: &str = "userToken2";

pub struct Fixture {
    pub repo: InMemoryRepository,
    pub state: AppState,
    pub spot_id: Uuid,
    pub admin: Principal,
    pub user1: Principal,
    pub user2: Principal,
}

fn new_user(name: &str, token: &str, role: UserRole) -> NewUser {
    NewUser {
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@test.com", name),
        roles: vec![role],
        token: token.to_string(),
    }
}

pub async fn fixture() -> Fixture {
    let repo = InMemoryRepository::new();
    let admin = repo
        .add_user(new_user("admin", ADMIN_TOKEN, UserRole::Admin))
        .await;
    let user1 = repo
        .add_user(new_user("user1", USER1_TOKEN, UserRole::User))
        .await;
    let user2 = repo
        .add_user(new_user("user2", USER2_TOKEN, UserRole::User))
        .await;
    let spot = repo.add_parking_spot("S1").await;

    Fixture {
        state: AppState::new(repo.clone()),
        repo,
        spot_id: spot.id,
        admin: Principal::from(&admin),
        user1: Principal::from(&user1),
        user2: Principal::from(&user2),
    }
}

/// Range offset from a base instant, in minutes.
pub fn range_at(base: DateTime<Utc>, start_minutes: i64, end_minutes: i64) -> DateRange {
    DateRange::new(
        base + Duration::minutes(start_minutes),
        base + Duration::minutes(end_minutes),
    )
}
