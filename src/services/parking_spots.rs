use serde::Serialize;
use uuid::Uuid;

use crate::entities::parking_spot;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Principal;
use crate::policy::{can_act, Action, Resource};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ParkingSpotResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<parking_spot::Model> for ParkingSpotResponse {
    fn from(spot: parking_spot::Model) -> Self {
        Self {
            id: spot.id,
            name: spot.name,
        }
    }
}

pub async fn list(
    state: &AppState,
    principal: &Principal,
) -> AppResult<Vec<ParkingSpotResponse>> {
    if !can_act(principal, Action::Read, Resource::ParkingSpot) {
        return Err(AppError::Forbidden(
            "You are not allowed to read parking spots".to_string(),
        ));
    }

    let spots = state.parking_spots.list_spots().await?;
    Ok(spots.into_iter().map(ParkingSpotResponse::from).collect())
}

/// Load a spot or fail with `NotFound(parkingSpotId)`.
pub async fn check_exists(state: &AppState, id: Uuid) -> AppResult<parking_spot::Model> {
    state
        .parking_spots
        .find_spot(id)
        .await?
        .ok_or_else(|| AppError::not_found("parkingSpotId"))
}
