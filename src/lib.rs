pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod services;
pub mod utils;

use std::sync::Arc;

use repository::{BookingRepository, ParkingSpotRepository, UserRepository};

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub parking_spots: Arc<dyn ParkingSpotRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    /// Wires every collaborator to one backing repository.
    pub fn new<R>(repo: R) -> Self
    where
        R: UserRepository + ParkingSpotRepository + BookingRepository + 'static,
    {
        let repo = Arc::new(repo);
        Self {
            users: repo.clone(),
            parking_spots: repo.clone(),
            bookings: repo,
        }
    }
}
