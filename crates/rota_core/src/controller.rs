//! The session controller: single writer over the session world.
//!
//! Every user intent lands here, is validated, applied synchronously, and
//! deferred work is left on the [SessionClock] for `advance_secs` /
//! `run_until_idle` to pump. The presentation layer re-renders from
//! [SessionSnapshot] after each call.

use bevy_ecs::prelude::{Entity, Schedule, With, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::auth;
use crate::clock::{EventKind, EventSubject, SessionClock, ONE_SEC_MS};
use crate::config::{OfferConfig, RideFlowConfig};
use crate::ecs::{Driver, Offer, OfferId};
use crate::error::{SessionError, SessionResult};
use crate::pricing::PricingConfig;
use crate::request::{RequestId, RequestStatus, RideRequest};
use crate::ride::{Ride, RideId, RideStatus};
use crate::runner::{run_next_event, run_until_empty, session_schedule};
use crate::scenario::{build_session, PassengerDirectory, SessionParams};
use crate::screen::{route, Screen};
use crate::session::SessionState;
use crate::snapshot::{capture, SessionSnapshot};
use crate::systems::deliver_offer::{delivery_seed, eta_minutes, sample_km};
use crate::users::{CurrentUser, GeoPoint, RideLocation, Role, UserId, VehicleType};

/// Mocked destination geometry: the original app offsets the pickup point by
/// a fixed delta instead of geocoding the address.
const DESTINATION_OFFSET: f64 = 0.05;

const PICKUP_ADDRESS: &str = "Minha Localização Atual";

pub struct SessionController {
    pub world: World,
    pub schedule: Schedule,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_params(SessionParams::default())
    }

    pub fn with_params(params: SessionParams) -> Self {
        let mut world = World::new();
        build_session(&mut world, params);
        Self {
            world,
            schedule: session_schedule(),
        }
    }


    /// Verify the phone/code pair and switch the session identity. Request,
    /// offers and ride survive an identity switch; only logout clears them.
    pub fn login(&mut self, phone: &str, code: &str) -> SessionResult<()> {
        let user = auth::verify_login(&mut self.world, phone, code)?;
        tracing::info!(role = ?user.role(), "login");
        self.world.resource_mut::<SessionState>().current_user = Some(user);
        Ok(())
    }

    /// Clears identity, request, offers, ride and all pending deferred work.
    pub fn logout(&mut self) {
        tracing::info!("logout");
        self.despawn_offers();
        let mut session = self.world.resource_mut::<SessionState>();
        session.current_user = None;
        session.active_request = None;
        session.active_ride = None;
        self.world.resource_mut::<SessionClock>().clear_pending();
    }


    /// Create a new request for the logged-in passenger, superseding any
    /// outstanding one. Eligible drivers are scheduled to answer with
    /// staggered offers.
    pub fn create_ride_request(
        &mut self,
        destination: &str,
        vehicle_kind: VehicleType,
    ) -> SessionResult<RequestId> {
        let passenger = self.require_passenger()?;
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(SessionError::MissingDestination);
        }
        if self.session().active_ride.is_some() {
            return Err(SessionError::RideInProgress);
        }
        let pickup = self
            .world
            .resource::<PassengerDirectory>()
            .find(passenger)
            .map(|p| p.location)
            .ok_or(SessionError::NoActiveSession)?;

        if let Some(previous) = self.world.resource_mut::<SessionState>().active_request.take() {
            self.discard_request(previous);
        }

        let request = {
            let now = self.world.resource::<SessionClock>().now();
            let mut session = self.world.resource_mut::<SessionState>();
            let id = session.allocate_request_id();
            RideRequest {
                id,
                passenger,
                from: RideLocation {
                    address: PICKUP_ADDRESS.to_string(),
                    point: pickup,
                },
                to: RideLocation {
                    address: destination.to_string(),
                    point: GeoPoint {
                        lat: pickup.lat + DESTINATION_OFFSET,
                        lng: pickup.lng + DESTINATION_OFFSET,
                    },
                },
                vehicle_kind,
                status: RequestStatus::Searching,
                created_at_ms: now,
            }
        };

        let eligible = self.eligible_drivers(vehicle_kind);
        let stagger = self.world.resource::<OfferConfig>().stagger_secs;
        {
            let mut clock = self.world.resource_mut::<SessionClock>();
            for (index, driver) in eligible.iter().enumerate() {
                clock.schedule_in_secs(
                    (index as u64 + 1) * stagger,
                    EventKind::DeliverOffer,
                    Some(EventSubject::Offer {
                        driver: *driver,
                        request: request.id,
                    }),
                );
            }
        }

        tracing::info!(
            request = request.id.0,
            destination = %request.to.address,
            eligible = eligible.len(),
            "ride request created"
        );
        let id = request.id;
        self.world.resource_mut::<SessionState>().active_request = Some(request);
        Ok(id)
    }

    /// Abandon the outstanding search. Only the requesting passenger may
    /// cancel; anything else is ignored.
    pub fn cancel_search(&mut self) -> SessionResult<()> {
        let is_requester = matches!(
            (&self.session().current_user, &self.session().active_request),
            (Some(CurrentUser::Passenger(id)), Some(request)) if *id == request.passenger
        );
        if !is_requester {
            return Ok(());
        }
        let Some(mut request) = self
            .world
            .resource_mut::<SessionState>()
            .active_request
            .take()
        else {
            return Ok(());
        };
        request.status = RequestStatus::Cancelled;
        tracing::info!(request = request.id.0, "search cancelled");
        self.discard_request(request);
        Ok(())
    }

    /// Accept one of the visible offers: fixes the fare, clears the request
    /// and offer set and starts the ride, all in one step.
    pub fn accept_offer(&mut self, offer_id: OfferId) -> SessionResult<RideId> {
        self.require_passenger()?;

        let request_id = self
            .session()
            .active_request
            .as_ref()
            .map(|request| request.id)
            .ok_or(SessionError::OfferExpired)?;
        if offer_id.request != request_id {
            return Err(SessionError::OfferExpired);
        }

        let offer = self
            .world
            .query::<&Offer>()
            .iter(&self.world)
            .find(|offer| offer.id == offer_id)
            .copied()
            .ok_or(SessionError::OfferExpired)?;

        let ride = {
            let mut session = self.world.resource_mut::<SessionState>();
            let Some(request) = session.active_request.take() else {
                return Err(SessionError::OfferExpired);
            };
            let id = session.allocate_ride_id();
            Ride {
                id,
                passenger: request.passenger,
                driver: offer.driver,
                from: request.from,
                to: request.to,
                fare: offer.fare,
                status: RideStatus::Accepted,
                started_at_ms: None,
                completed_at_ms: None,
            }
        };
        self.despawn_offers();
        self.world
            .resource_mut::<SessionClock>()
            .revoke_request(request_id);

        tracing::info!(ride = ride.id.0, fare = ride.fare, "offer accepted");
        let id = ride.id;
        self.world.resource_mut::<SessionState>().active_ride = Some(ride);
        Ok(id)
    }

    /// The driver-side counter-proposal: deliver an offer at the driver's
    /// chosen fare against the visible request. Subject to the same
    /// eligibility rules as generated offers.
    pub fn submit_driver_offer(&mut self, fare: f64) -> SessionResult<()> {
        let driver_entity = self.require_driver()?;
        if !fare.is_finite() || fare <= 0.0 {
            return Err(SessionError::InvalidFare);
        }
        let (request_id, vehicle_kind) = self
            .session()
            .active_request
            .as_ref()
            .map(|request| (request.id, request.vehicle_kind))
            .ok_or(SessionError::OfferExpired)?;

        let driver = self
            .world
            .get::<Driver>(driver_entity)
            .ok_or(SessionError::NoActiveSession)?;
        if !driver.is_online || driver.vehicle.kind != vehicle_kind {
            tracing::debug!(driver = %driver.profile.name, "ineligible driver proposal ignored");
            return Ok(());
        }
        let offer_id = OfferId {
            request: request_id,
            driver: driver.profile.id,
        };

        let config = *self.world.resource::<OfferConfig>();
        let seed = delivery_seed(&config, driver_entity.index(), request_id).wrapping_add(0x5EED);
        let mut rng = StdRng::seed_from_u64(seed);
        let pickup_km = sample_km(&mut rng, config.min_pickup_km, config.max_pickup_km);
        let offer = Offer {
            id: offer_id,
            driver: driver_entity,
            fare,
            eta_minutes: eta_minutes(pickup_km, config.eta_minutes_per_km),
        };

        // A driver revising their proposal replaces it; offers stay unique
        // per (driver, request).
        let existing = self
            .world
            .query::<(Entity, &Offer)>()
            .iter(&self.world)
            .find(|(_, o)| o.id == offer_id)
            .map(|(entity, _)| entity);
        if let Some(entity) = existing {
            if let Some(mut slot) = self.world.get_mut::<Offer>(entity) {
                *slot = offer;
            }
        } else {
            self.world.spawn(offer);
        }

        if let Some(request) = self
            .world
            .resource_mut::<SessionState>()
            .active_request
            .as_mut()
        {
            request.status = RequestStatus::OffersReceived;
        }
        tracing::info!(request = request_id.0, fare, "driver proposal delivered");
        Ok(())
    }


    /// Advance the ride state machine. Forward transitions are driver-only;
    /// cancellations must come from the matching party. Calls that do not
    /// apply (no ride, wrong party, illegal transition) are ignored.
    pub fn update_ride_status(&mut self, status: RideStatus) -> SessionResult<()> {
        let Some((ride_id, current, driver_entity, passenger)) = self
            .session()
            .active_ride
            .as_ref()
            .map(|ride| (ride.id, ride.status, ride.driver, ride.passenger))
        else {
            return Ok(());
        };

        let allowed = match status {
            RideStatus::DriverArriving
            | RideStatus::InProgress
            | RideStatus::Completed
            | RideStatus::CancelledByDriver => self.is_ride_driver(driver_entity),
            RideStatus::CancelledByPassenger => self.is_ride_passenger(passenger),
            RideStatus::Accepted => false,
        };
        if !allowed || !current.can_transition_to(status) {
            tracing::debug!(ride = ride_id.0, ?current, next = ?status, "status update ignored");
            return Ok(());
        }

        let now = self.world.resource::<SessionClock>().now();
        {
            let mut session = self.world.resource_mut::<SessionState>();
            let Some(ride) = session.active_ride.as_mut() else {
                return Ok(());
            };
            ride.status = status;
            match status {
                RideStatus::InProgress => ride.started_at_ms = Some(now),
                RideStatus::Completed => ride.completed_at_ms = Some(now),
                _ => {}
            }
            if status.is_cancelled() {
                session.active_ride = None;
            }
        }

        if status == RideStatus::Completed {
            let grace = self.world.resource::<RideFlowConfig>().completed_display_secs;
            self.world.resource_mut::<SessionClock>().schedule_in_secs(
                grace,
                EventKind::ClearRide,
                Some(EventSubject::Ride(ride_id)),
            );
        }

        tracing::info!(ride = ride_id.0, status = ?status, "ride status updated");
        Ok(())
    }

    /// Cancel the active ride on behalf of the logged-in party.
    pub fn cancel_ride(&mut self) -> SessionResult<()> {
        let status = match &self.session().current_user {
            Some(CurrentUser::Passenger(_)) => RideStatus::CancelledByPassenger,
            Some(CurrentUser::Driver(_)) => RideStatus::CancelledByDriver,
            _ => return Ok(()),
        };
        self.update_ride_status(status)
    }


    /// Flip the logged-in driver's availability. Pending deliveries are not
    /// revoked; delivery re-checks eligibility.
    pub fn toggle_driver_online(&mut self, online: bool) -> SessionResult<()> {
        let entity = self.require_driver()?;
        let mut driver = self
            .world
            .get_mut::<Driver>(entity)
            .ok_or(SessionError::NoActiveSession)?;
        driver.is_online = online;
        tracing::info!(driver = %driver.profile.name, online, "driver availability toggled");
        Ok(())
    }

    /// Replace the pricing table. Administrator only.
    pub fn save_pricing_config(&mut self, config: PricingConfig) -> SessionResult<()> {
        self.require_admin()?;
        if !config.is_valid() {
            return Err(SessionError::InvalidPricingValue);
        }
        self.world.insert_resource(config);
        tracing::info!("pricing config saved");
        Ok(())
    }


    /// Drain every event due within the next `secs` seconds, then move the
    /// clock to the end of the window.
    pub fn advance_secs(&mut self, secs: u64) {
        let target = self.world.resource::<SessionClock>().now() + secs * ONE_SEC_MS;
        loop {
            let due = self
                .world
                .resource::<SessionClock>()
                .next_event_time()
                .is_some_and(|next| next <= target);
            if !due || !run_next_event(&mut self.world, &mut self.schedule) {
                break;
            }
        }
        self.world.resource_mut::<SessionClock>().fast_forward(target);
    }

    /// Run pending events until the clock drains or `max_steps` is reached.
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        run_until_empty(&mut self.world, &mut self.schedule, max_steps)
    }

    pub fn screen(&self) -> Screen {
        route(self.session())
    }

    pub fn snapshot(&mut self) -> SessionSnapshot {
        capture(&mut self.world)
    }


    fn session(&self) -> &SessionState {
        self.world.resource::<SessionState>()
    }

    fn require_passenger(&self) -> SessionResult<UserId> {
        match &self.session().current_user {
            Some(CurrentUser::Passenger(id)) => Ok(*id),
            Some(_) => Err(SessionError::RoleMismatch(Role::Passenger)),
            None => Err(SessionError::NoActiveSession),
        }
    }

    fn require_driver(&self) -> SessionResult<Entity> {
        match &self.session().current_user {
            Some(CurrentUser::Driver(entity)) => Ok(*entity),
            Some(_) => Err(SessionError::RoleMismatch(Role::Driver)),
            None => Err(SessionError::NoActiveSession),
        }
    }

    fn require_admin(&self) -> SessionResult<()> {
        match &self.session().current_user {
            Some(CurrentUser::Admin(_)) => Ok(()),
            Some(_) => Err(SessionError::RoleMismatch(Role::Admin)),
            None => Err(SessionError::NoActiveSession),
        }
    }

    fn is_ride_driver(&self, driver: Entity) -> bool {
        matches!(
            &self.session().current_user,
            Some(CurrentUser::Driver(entity)) if *entity == driver
        )
    }

    fn is_ride_passenger(&self, passenger: UserId) -> bool {
        matches!(
            &self.session().current_user,
            Some(CurrentUser::Passenger(id)) if *id == passenger
        )
    }

    /// Ascending entity order keeps the stagger enumeration stable.
    fn eligible_drivers(&mut self, vehicle_kind: VehicleType) -> Vec<Entity> {
        let mut eligible: Vec<Entity> = self
            .world
            .query::<(Entity, &Driver)>()
            .iter(&self.world)
            .filter(|(_, driver)| driver.is_online && driver.vehicle.kind == vehicle_kind)
            .map(|(entity, _)| entity)
            .collect();
        eligible.sort();
        eligible
    }

    /// Drop a superseded or cancelled request: visible offers and pending
    /// deliveries go with it.
    fn discard_request(&mut self, request: RideRequest) {
        self.despawn_offers();
        self.world
            .resource_mut::<SessionClock>()
            .revoke_request(request.id);
    }

    fn despawn_offers(&mut self) {
        let offers: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Offer>>()
            .iter(&self.world)
            .collect();
        for entity in offers {
            self.world.despawn(entity);
        }
    }
}
