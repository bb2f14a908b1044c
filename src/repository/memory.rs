use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingRepository, NewBooking, NewUser, ParkingSpotRepository, UserRepository};
use crate::entities::{booking, parking_spot, user};
use crate::error::{AppError, AppResult};
use crate::utils::date_range::DateRange;

#[derive(Default)]
struct Store {
    users: Vec<user::Model>,
    spots: Vec<parking_spot::Model>,
    bookings: Vec<booking::Model>,
}

impl Store {
    fn find_overlap(
        &self,
        parking_spot_id: Uuid,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Option<&booking::Model> {
        self.bookings.iter().find(|b| {
            b.parking_spot_id == parking_spot_id
                && Some(b.id) != exclude
                && range.has_endpoint_within(
                    b.start_date.with_timezone(&Utc),
                    b.end_date.with_timezone(&Utc),
                )
        })
    }
}

/// Process-local storage with the same observable behavior as the Postgres
/// repository. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, new: NewUser) -> user::Model {
        let now = Utc::now().into();
        let model = user::Model {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            roles: new.roles,
            token: new.token,
            created_at: now,
            updated_at: now,
        };
        self.store.write().await.users.push(model.clone());
        model
    }

    pub async fn add_parking_spot(&self, name: &str) -> parking_spot::Model {
        let now = Utc::now().into();
        let model = parking_spot::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.write().await.spots.push(model.clone());
        model
    }

    /// Removes a spot together with its bookings, as the schema's cascade does.
    pub async fn remove_parking_spot(&self, id: Uuid) {
        let mut store = self.store.write().await;
        store.spots.retain(|s| s.id != id);
        store.bookings.retain(|b| b.parking_spot_id != id);
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|u| u.token == token).cloned())
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.store.read().await.users.len() as u64)
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> AppResult<()> {
        for new in users {
            self.add_user(new).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ParkingSpotRepository for InMemoryRepository {
    async fn list_spots(&self) -> AppResult<Vec<parking_spot::Model>> {
        Ok(self.store.read().await.spots.clone())
    }

    async fn find_spot(&self, id: Uuid) -> AppResult<Option<parking_spot::Model>> {
        let store = self.store.read().await;
        Ok(store.spots.iter().find(|s| s.id == id).cloned())
    }

    async fn count_spots(&self) -> AppResult<u64> {
        Ok(self.store.read().await.spots.len() as u64)
    }

    async fn insert_spots(&self, names: Vec<String>) -> AppResult<()> {
        for name in names {
            self.add_parking_spot(&name).await;
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryRepository {
    async fn list_by_spot(&self, parking_spot_id: Uuid) -> AppResult<Vec<booking::Model>> {
        let store = self.store.read().await;
        let mut bookings: Vec<_> = store
            .bookings
            .iter()
            .filter(|b| b.parking_spot_id == parking_spot_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start_date);
        Ok(bookings)
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<booking::Model>> {
        let store = self.store.read().await;
        Ok(store.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn find_one_in_date_range(
        &self,
        parking_spot_id: Uuid,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<booking::Model>> {
        let store = self.store.read().await;
        Ok(store.find_overlap(parking_spot_id, range, exclude).cloned())
    }

    async fn insert_booking(&self, new: NewBooking) -> AppResult<booking::Model> {
        let mut store = self.store.write().await;

        if store.find_overlap(new.parking_spot_id, new.range, None).is_some() {
            return Err(AppError::OverlappingBooking);
        }

        let now = Utc::now().into();
        let model = booking::Model {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            parking_spot_id: new.parking_spot_id,
            start_date: new.range.start_fixed(),
            end_date: new.range.end_fixed(),
            created_at: now,
            updated_at: now,
        };
        store.bookings.push(model.clone());
        Ok(model)
    }

    async fn update_booking_range(
        &self,
        id: Uuid,
        parking_spot_id: Uuid,
        range: DateRange,
    ) -> AppResult<booking::Model> {
        let mut store = self.store.write().await;

        if store.find_overlap(parking_spot_id, range, Some(id)).is_some() {
            return Err(AppError::OverlappingBooking);
        }

        let booking = store
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found("bookingId"))?;

        booking.start_date = range.start_fixed();
        booking.end_date = range.end_fixed();
        booking.updated_at = Utc::now().into();
        Ok(booking.clone())
    }

    async fn delete_booking(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.store.write().await;
        let before = store.bookings.len();
        store.bookings.retain(|b| b.id != id);

        if store.bookings.len() == before {
            return Err(AppError::not_found("bookingId"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn range_from_now(start_hours: i64, end_hours: i64) -> DateRange {
        let now = Utc::now();
        DateRange::new(now + Duration::hours(start_hours), now + Duration::hours(end_hours))
    }

    #[tokio::test]
    async fn test_overlap_lookup_is_scoped_to_spot() {
        let repo = InMemoryRepository::new();
        let spot_a = repo.add_parking_spot("A").await;
        let spot_b = repo.add_parking_spot("B").await;

        repo.insert_booking(NewBooking {
            user_id: Uuid::new_v4(),
            parking_spot_id: spot_a.id,
            range: range_from_now(1, 3),
        })
        .await
        .unwrap();

        let candidate = range_from_now(2, 4);
        assert!(repo
            .find_one_in_date_range(spot_a.id, candidate, None)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_one_in_date_range(spot_b.id, candidate, None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_rechecks_overlap() {
        let repo = InMemoryRepository::new();
        let spot = repo.add_parking_spot("A").await;
        let new = NewBooking {
            user_id: Uuid::new_v4(),
            parking_spot_id: spot.id,
            range: range_from_now(1, 2),
        };

        repo.insert_booking(new).await.unwrap();
        let err = repo.insert_booking(new).await.unwrap_err();
        assert!(matches!(err, AppError::OverlappingBooking));
    }

    #[tokio::test]
    async fn test_remove_spot_cascades_to_bookings() {
        let repo = InMemoryRepository::new();
        let spot = repo.add_parking_spot("A").await;
        let booking = repo
            .insert_booking(NewBooking {
                user_id: Uuid::new_v4(),
                parking_spot_id: spot.id,
                range: range_from_now(1, 2),
            })
            .await
            .unwrap();

        repo.remove_parking_spot(spot.id).await;

        assert!(repo.find_booking(booking.id).await.unwrap().is_none());
        assert!(repo.find_spot(spot.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_booking() {
        let repo = InMemoryRepository::new();
        let err = repo.delete_booking(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { param: "bookingId" }));
    }
}
