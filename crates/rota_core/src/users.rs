//! Identity records shared by every role. Role-specific payload lives on the
//! [CurrentUser] variants, not on the profile itself.

use bevy_ecs::prelude::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Passenger,
    Driver,
    Admin,
}

/// Ordinal reputation tier, independent of the numeric rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProfileLevel {
    Level1,
    Level2,
    Level3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    /// 0.0 to 5.0.
    pub rating: f64,
    pub level: ProfileLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "Carro")]
    Car,
    Moto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub model: String,
    pub plate: String,
    pub kind: VehicleType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideLocation {
    pub address: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub profile: UserProfile,
    pub location: GeoPoint,
}

/// The authenticated identity, tagged by role. Passengers are looked up in
/// the passenger directory, drivers reference their roster entity, the
/// administrator carries its minted profile directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentUser {
    Passenger(UserId),
    Driver(Entity),
    Admin(UserProfile),
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        match self {
            CurrentUser::Passenger(_) => Role::Passenger,
            CurrentUser::Driver(_) => Role::Driver,
            CurrentUser::Admin(_) => Role::Admin,
        }
    }
}
