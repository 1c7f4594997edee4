//! Render-ready view of the whole session, captured after every mutation.
//! The presentation layer re-renders from this alone, no follow-up queries.

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::ecs::{Driver, Offer, OfferId, Position};
use crate::pricing::PricingConfig;
use crate::request::RideRequest;
use crate::ride::{Ride, RideId, RideStatus};
use crate::scenario::PassengerDirectory;
use crate::screen::{route, Screen};
use crate::session::SessionState;
use crate::users::{
    CurrentUser, GeoPoint, ProfileLevel, RideLocation, Role, UserId, UserProfile, Vehicle,
};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub role: Role,
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverView {
    pub id: UserId,
    pub name: String,
    pub rating: f64,
    pub level: ProfileLevel,
    pub vehicle: Vehicle,
    pub is_online: bool,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub id: OfferId,
    pub driver_name: String,
    pub driver_rating: f64,
    pub driver_level: ProfileLevel,
    pub vehicle: Vehicle,
    pub fare: f64,
    pub eta_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RideView {
    pub id: RideId,
    pub status: RideStatus,
    pub fare: f64,
    pub passenger: Option<UserProfile>,
    pub driver: Option<UserProfile>,
    pub vehicle: Option<Vehicle>,
    pub from: RideLocation,
    pub to: RideLocation,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub user: Option<UserView>,
    pub pricing: PricingConfig,
    pub drivers: Vec<DriverView>,
    pub request: Option<RideRequest>,
    pub offers: Vec<OfferView>,
    pub ride: Option<RideView>,
}

fn user_view(world: &World, user: &CurrentUser) -> Option<UserView> {
    let profile = match user {
        CurrentUser::Passenger(id) => world
            .resource::<PassengerDirectory>()
            .find(*id)
            .map(|p| p.profile.clone())?,
        CurrentUser::Driver(entity) => world.get::<Driver>(*entity).map(|d| d.profile.clone())?,
        CurrentUser::Admin(profile) => profile.clone(),
    };
    Some(UserView {
        role: user.role(),
        profile,
    })
}

fn ride_view(world: &World, ride: &Ride) -> RideView {
    let driver = world.get::<Driver>(ride.driver);
    RideView {
        id: ride.id,
        status: ride.status,
        fare: ride.fare,
        passenger: world
            .resource::<PassengerDirectory>()
            .find(ride.passenger)
            .map(|p| p.profile.clone()),
        driver: driver.map(|d| d.profile.clone()),
        vehicle: driver.map(|d| d.vehicle.clone()),
        from: ride.from.clone(),
        to: ride.to.clone(),
        started_at_ms: ride.started_at_ms,
        completed_at_ms: ride.completed_at_ms,
    }
}

/// Capture the full render state. Roster and offers are sorted by stable
/// identities so consecutive snapshots diff cleanly.
pub fn capture(world: &mut World) -> SessionSnapshot {
    let mut drivers: Vec<DriverView> = world
        .query::<(&Driver, &Position)>()
        .iter(world)
        .map(|(driver, position)| DriverView {
            id: driver.profile.id,
            name: driver.profile.name.clone(),
            rating: driver.profile.rating,
            level: driver.profile.level,
            vehicle: driver.vehicle.clone(),
            is_online: driver.is_online,
            location: position.0,
        })
        .collect();
    drivers.sort_by_key(|view| view.id);

    let mut offers: Vec<OfferView> = world
        .query::<&Offer>()
        .iter(world)
        .filter_map(|offer| {
            let driver = world.get::<Driver>(offer.driver)?;
            Some(OfferView {
                id: offer.id,
                driver_name: driver.profile.name.clone(),
                driver_rating: driver.profile.rating,
                driver_level: driver.profile.level,
                vehicle: driver.vehicle.clone(),
                fare: offer.fare,
                eta_minutes: offer.eta_minutes,
            })
        })
        .collect();
    offers.sort_by_key(|view| view.id);

    let session = world.resource::<SessionState>();
    SessionSnapshot {
        screen: route(session),
        user: session
            .current_user
            .as_ref()
            .and_then(|user| user_view(world, user)),
        pricing: *world.resource::<PricingConfig>(),
        drivers,
        request: session.active_request.clone(),
        offers,
        ride: session.active_ride.as_ref().map(|ride| ride_view(world, ride)),
    }
}
