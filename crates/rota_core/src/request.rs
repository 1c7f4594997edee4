use serde::Serialize;

use crate::users::{RideLocation, UserId, VehicleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestStatus {
    Searching,
    OffersReceived,
    Cancelled,
}

/// A passenger's outstanding ask for a ride match. At most one exists per
/// session; it is dropped on acceptance or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideRequest {
    pub id: RequestId,
    pub passenger: UserId,
    pub from: RideLocation,
    pub to: RideLocation,
    pub vehicle_kind: VehicleType,
    pub status: RequestStatus,
    /// Session clock time when the request was submitted (ms).
    pub created_at_ms: u64,
}
