use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::parse_id;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Principal;
use crate::services::bookings::{self, BookingResponse};
use crate::utils::date_range::DateRange;
use crate::AppState;

const START_PARAM: &str = "startDateInTimestampMillis";
const END_PARAM: &str = "endDateInTimestampMillis";

/// Body of both create and update requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDatesRequest {
    pub start_date_in_timestamp_millis: i64,
    pub end_date_in_timestamp_millis: i64,
}

impl BookingDatesRequest {
    fn into_range(self) -> AppResult<DateRange> {
        DateRange::from_millis(
            self.start_date_in_timestamp_millis,
            self.end_date_in_timestamp_millis,
            START_PARAM,
            END_PARAM,
        )
    }
}

fn read_body(payload: Result<Json<BookingDatesRequest>, JsonRejection>) -> AppResult<DateRange> {
    let Json(body) =
        payload.map_err(|rejection| AppError::validation("body", rejection.body_text()))?;
    body.into_range()
}

/// List bookings of a parking spot
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(parking_spot_id): Path<String>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let parking_spot_id = parse_id(&parking_spot_id, "parkingSpotId")?;
    let bookings = bookings::list(&state, parking_spot_id, &principal).await?;
    Ok(Json(bookings))
}

/// Book a parking spot
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(parking_spot_id): Path<String>,
    payload: Result<Json<BookingDatesRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let parking_spot_id = parse_id(&parking_spot_id, "parkingSpotId")?;
    let range = read_body(payload)?;

    let booking = bookings::create(&state, parking_spot_id, range, &principal).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Move a booking to new dates
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((parking_spot_id, booking_id)): Path<(String, String)>,
    payload: Result<Json<BookingDatesRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let parking_spot_id = parse_id(&parking_spot_id, "parkingSpotId")?;
    let booking_id = parse_id(&booking_id, "bookingId")?;
    let range = read_body(payload)?;

    bookings::update(&state, parking_spot_id, booking_id, range, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cancel a booking
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((parking_spot_id, booking_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let parking_spot_id = parse_id(&parking_spot_id, "parkingSpotId")?;
    let booking_id = parse_id(&booking_id, "bookingId")?;

    bookings::delete(&state, parking_spot_id, booking_id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}
