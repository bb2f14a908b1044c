use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use crate::handlers::{self, bookings, parking_spots};
use crate::middleware::auth::auth_middleware;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Every API route requires an x-api-key
    let api_routes = Router::new()
        .route("/parking-spots", get(parking_spots::list_parking_spots))
        .route(
            "/parking-spots/{parking_spot_id}/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/parking-spots/{parking_spot_id}/bookings/{booking_id}",
            patch(bookings::update_booking).delete(bookings::delete_booking),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/v1", api_routes)
        .with_state(state)
}
