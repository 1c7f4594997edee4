use bevy_ecs::prelude::Resource;

use crate::request::{RequestId, RideRequest};
use crate::ride::{Ride, RideId};
use crate::users::{CurrentUser, Role};

/// Authoritative session state. At most one request and one ride exist at a
/// time; both invariants are held structurally by the `Option` fields. Only
/// the controller and the clock-driven systems mutate this resource.
#[derive(Debug, Default, Resource)]
pub struct SessionState {
    pub current_user: Option<CurrentUser>,
    pub active_request: Option<RideRequest>,
    pub active_ride: Option<Ride>,
    next_request_id: u64,
    next_ride_id: u64,
}

impl SessionState {
    pub fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        RequestId(self.next_request_id)
    }

    pub fn allocate_ride_id(&mut self) -> RideId {
        self.next_ride_id += 1;
        RideId(self.next_ride_id)
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user.as_ref().map(CurrentUser::role)
    }
}
