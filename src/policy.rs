//! Who may do what to which resource.

use uuid::Uuid;

use crate::middleware::auth::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    ParkingSpot,
    /// The bookings held on one spot, taken as a collection.
    SpotBookings { parking_spot: Uuid },
    Booking { owner: Uuid },
}

pub fn can_act(principal: &Principal, action: Action, resource: Resource) -> bool {
    match (action, resource) {
        (Action::Read, _) => true,
        (Action::Create, Resource::Booking { .. }) => true,
        (Action::Update | Action::Delete, Resource::Booking { owner }) => {
            principal.is_admin() || principal.user_id == owner
        }
        // Spots are managed outside the API; bookings are written one at a time.
        (
            Action::Create | Action::Update | Action::Delete,
            Resource::ParkingSpot | Resource::SpotBookings { .. },
        ) => false,
    }
}
