pub mod bookings;
pub mod parking_spots;
