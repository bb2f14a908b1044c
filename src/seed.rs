//! Development fixtures: three users with well-known tokens and ten spots.

use crate::entities::user::UserRole;
use crate::error::AppResult;
use crate::repository::{NewUser, ParkingSpotRepository, UserRepository};

pub const ADMIN_AUTH_TOKEN: &str = "adminToken1";
pub const USER1_AUTH_TOKEN: &str = "userToken1";
pub const USER2_AUTH_TOKEN: &str = "userToken2";

pub const SEEDED_SPOT_COUNT: usize = 10;

fn seed_users_list() -> Vec<NewUser> {
    vec![
        NewUser {
            first_name: "Admin First Name".to_string(),
            last_name: "Admin Last Name".to_string(),
            email: "admin@test.com".to_string(),
            roles: vec![UserRole::Admin],
            token: ADMIN_AUTH_TOKEN.to_string(),
        },
        NewUser {
            first_name: "User First Name 1".to_string(),
            last_name: "User Last Name 1".to_string(),
            email: "user1@test.com".to_string(),
            roles: vec![UserRole::User],
            token: USER1_AUTH_TOKEN.to_string(),
        },
        NewUser {
            first_name: "User First Name 2".to_string(),
            last_name: "User Last Name 2".to_string(),
            email: "user2@test.com".to_string(),
            roles: vec![UserRole::User],
            token: USER2_AUTH_TOKEN.to_string(),
        },
    ]
}

/// Inserts the fixture users unless the table already has rows.
pub async fn seed_users(users: &dyn UserRepository) -> AppResult<bool> {
    if users.count_users().await? > 0 {
        return Ok(false);
    }

    users.insert_users(seed_users_list()).await?;
    tracing::info!("Seeded development users");
    Ok(true)
}

/// Inserts "Parking Spot 1" through "Parking Spot 10" unless spots exist.
pub async fn seed_parking_spots(spots: &dyn ParkingSpotRepository) -> AppResult<bool> {
    if spots.count_spots().await? > 0 {
        return Ok(false);
    }

    let names = (1..=SEEDED_SPOT_COUNT)
        .map(|i| format!("Parking Spot {}", i))
        .collect();
    spots.insert_spots(names).await?;
    tracing::info!(count = SEEDED_SPOT_COUNT, "Seeded parking spots");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn test_seeding_runs_once() {
        let repo = InMemoryRepository::new();

        assert!(seed_users(&repo).await.unwrap());
        assert!(seed_parking_spots(&repo).await.unwrap());
        assert!(!seed_users(&repo).await.unwrap());
        assert!(!seed_parking_spots(&repo).await.unwrap());

        assert_eq!(repo.count_users().await.unwrap(), 3);
        assert_eq!(repo.count_spots().await.unwrap(), SEEDED_SPOT_COUNT as u64);
    }

    #[tokio::test]
    async fn test_seeded_tokens_resolve_with_roles() {
        let repo = InMemoryRepository::new();
        seed_users(&repo).await.unwrap();

        let admin = repo.find_by_token(ADMIN_AUTH_TOKEN).await.unwrap().unwrap();
        assert_eq!(admin.roles, vec![UserRole::Admin]);

        let user = repo.find_by_token(USER2_AUTH_TOKEN).await.unwrap().unwrap();
        assert_eq!(user.roles, vec![UserRole::User]);
    }
}
