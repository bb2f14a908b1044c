use axum::{extract::State, Extension, Json};

use crate::error::AppResult;
use crate::middleware::auth::Principal;
use crate::services::parking_spots::{self, ParkingSpotResponse};
use crate::AppState;

/// List all parking spots
pub async fn list_parking_spots(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<ParkingSpotResponse>>> {
    Ok(Json(parking_spots::list(&state, &principal).await?))
}
