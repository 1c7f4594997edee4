//! ClearRide system: after the post-completion grace period the ride leaves
//! the session and routing falls back to the role home.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ride::RideStatus;
use crate::session::SessionState;

pub fn clear_ride_system(event: Res<CurrentEvent>, mut session: ResMut<SessionState>) {
    if event.0.kind != EventKind::ClearRide {
        return;
    }
    let Some(EventSubject::Ride(ride_id)) = event.0.subject else {
        return;
    };
    let Some(ride) = session.active_ride.as_ref() else {
        return;
    };
    if ride.id != ride_id || ride.status != RideStatus::Completed {
        return;
    }

    tracing::debug!(ride = ride_id.0, "completed ride cleared");
    session.active_ride = None;
}
