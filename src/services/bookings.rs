//! Booking lifecycle: existence checks, ownership, date rules and overlap.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::booking;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Principal;
use crate::policy::{can_act, Action, Resource};
use crate::repository::NewBooking;
use crate::services::parking_spots;
use crate::utils::date_range::{to_iso_string, DateRange};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<booking::Model> for BookingResponse {
    fn from(booking: booking::Model) -> Self {
        Self {
            id: booking.id,
            start_date: to_iso_string(booking.start_date),
            end_date: to_iso_string(booking.end_date),
            created_at: to_iso_string(booking.created_at),
            updated_at: to_iso_string(booking.updated_at),
        }
    }
}

fn authorize(principal: &Principal, action: Action, resource: Resource) -> AppResult<()> {
    if can_act(principal, action, resource) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not allowed to update this resource".to_string(),
        ))
    }
}

async fn check_overlaps(
    state: &AppState,
    parking_spot_id: Uuid,
    range: DateRange,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let existing = state
        .bookings
        .find_one_in_date_range(parking_spot_id, range, exclude)
        .await?;

    match existing {
        Some(_) => Err(AppError::OverlappingBooking),
        None => Ok(()),
    }
}

/// Loads a booking that must belong to `parking_spot_id`.
async fn find_in_spot(
    state: &AppState,
    parking_spot_id: Uuid,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    let booking = state
        .bookings
        .find_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("bookingId"))?;

    if booking.parking_spot_id != parking_spot_id {
        return Err(AppError::not_found("bookingId"));
    }

    Ok(booking)
}

pub async fn list(
    state: &AppState,
    parking_spot_id: Uuid,
    principal: &Principal,
) -> AppResult<Vec<BookingResponse>> {
    let spot = parking_spots::check_exists(state, parking_spot_id).await?;
    authorize(
        principal,
        Action::Read,
        Resource::SpotBookings {
            parking_spot: spot.id,
        },
    )?;

    let bookings = state.bookings.list_by_spot(spot.id).await?;
    Ok(bookings.into_iter().map(BookingResponse::from).collect())
}

pub async fn create(
    state: &AppState,
    parking_spot_id: Uuid,
    range: DateRange,
    principal: &Principal,
) -> AppResult<BookingResponse> {
    let spot = parking_spots::check_exists(state, parking_spot_id).await?;
    authorize(
        principal,
        Action::Create,
        Resource::Booking {
            owner: principal.user_id,
        },
    )?;

    range.validate(Utc::now())?;
    check_overlaps(state, spot.id, range, None).await?;

    let booking = state
        .bookings
        .insert_booking(NewBooking {
            user_id: principal.user_id,
            parking_spot_id: spot.id,
            range,
        })
        .await?;

    tracing::info!(
        booking_id = %booking.id,
        parking_spot_id = %spot.id,
        user_id = %principal.user_id,
        "Booking created"
    );

    Ok(BookingResponse::from(booking))
}

pub async fn update(
    state: &AppState,
    parking_spot_id: Uuid,
    booking_id: Uuid,
    range: DateRange,
    principal: &Principal,
) -> AppResult<()> {
    let spot = parking_spots::check_exists(state, parking_spot_id).await?;
    let booking = find_in_spot(state, spot.id, booking_id).await?;
    authorize(
        principal,
        Action::Update,
        Resource::Booking {
            owner: booking.user_id,
        },
    )?;

    range.validate(Utc::now())?;
    check_overlaps(state, spot.id, range, Some(booking.id)).await?;

    state
        .bookings
        .update_booking_range(booking.id, spot.id, range)
        .await?;

    tracing::info!(
        booking_id = %booking.id,
        parking_spot_id = %spot.id,
        user_id = %principal.user_id,
        "Booking updated"
    );

    Ok(())
}

pub async fn delete(
    state: &AppState,
    parking_spot_id: Uuid,
    booking_id: Uuid,
    principal: &Principal,
) -> AppResult<()> {
    let spot = parking_spots::check_exists(state, parking_spot_id).await?;
    let booking = find_in_spot(state, spot.id, booking_id).await?;
    authorize(
        principal,
        Action::Delete,
        Resource::Booking {
            owner: booking.user_id,
        },
    )?;

    state.bookings.delete_booking(booking.id).await?;

    tracing::info!(
        booking_id = %booking.id,
        parking_spot_id = %spot.id,
        user_id = %principal.user_id,
        "Booking deleted"
    );

    Ok(())
}
