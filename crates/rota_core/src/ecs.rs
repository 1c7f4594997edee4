use bevy_ecs::prelude::{Component, Entity};
use serde::Serialize;

use crate::request::RequestId;
use crate::users::{GeoPoint, UserId, UserProfile, Vehicle};

/// Offer identity, derived from the request and the offering driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OfferId {
    pub request: RequestId,
    pub driver: UserId,
}

/// A roster driver. `is_online` is mutated only through the driver's own
/// toggle intent.
#[derive(Debug, Clone, Component)]
pub struct Driver {
    pub profile: UserProfile,
    pub vehicle: Vehicle,
    pub is_online: bool,
}

/// Static in this simulation.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Position(pub GeoPoint);

/// A driver's proposed fare/ETA against the active request. Cleared wholesale
/// whenever the request changes.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Offer {
    pub id: OfferId,
    pub driver: Entity,
    pub fare: f64,
    pub eta_minutes: u32,
}
