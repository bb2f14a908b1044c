//! Storage collaborators used by the booking services.
//!
//! Each concern is an object-safe trait so handlers can run against either the
//! Postgres-backed [`SeaOrmRepository`] or the [`InMemoryRepository`].

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{booking, parking_spot, user};
use crate::entities::user::UserRole;
use crate::error::AppResult;
use crate::utils::date_range::DateRange;

pub use memory::InMemoryRepository;
pub use postgres::SeaOrmRepository;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<UserRole>,
    pub token: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub parking_spot_id: Uuid,
    pub range: DateRange,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>>;

    async fn count_users(&self) -> AppResult<u64>;

    async fn insert_users(&self, users: Vec<NewUser>) -> AppResult<()>;
}

#[async_trait]
pub trait ParkingSpotRepository: Send + Sync {
    async fn list_spots(&self) -> AppResult<Vec<parking_spot::Model>>;

    async fn find_spot(&self, id: Uuid) -> AppResult<Option<parking_spot::Model>>;

    async fn count_spots(&self) -> AppResult<u64>;

    async fn insert_spots(&self, names: Vec<String>) -> AppResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_by_spot(&self, parking_spot_id: Uuid) -> AppResult<Vec<booking::Model>>;

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<booking::Model>>;

    /// First booking on the spot whose start or end lies within `range`,
    /// ignoring `exclude` when given.
    async fn find_one_in_date_range(
        &self,
        parking_spot_id: Uuid,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<booking::Model>>;

    /// Stores a booking. Fails with `OverlappingBooking` if a conflicting
    /// booking was committed after the caller's own overlap check.
    async fn insert_booking(&self, new: NewBooking) -> AppResult<booking::Model>;

    /// Moves a booking to `range`, with the same conflict guarantee as
    /// [`BookingRepository::insert_booking`].
    async fn update_booking_range(
        &self,
        id: Uuid,
        parking_spot_id: Uuid,
        range: DateRange,
    ) -> AppResult<booking::Model>;

    async fn delete_booking(&self, id: Uuid) -> AppResult<()>;
}
