//! DeliverOffer system: a driver's staggered offer lands against the active
//! request, unless the request moved on or the driver is no longer eligible.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::config::OfferConfig;
use crate::ecs::{Driver, Offer, OfferId};
use crate::pricing::{compute_fare, PricingConfig};
use crate::request::{RequestId, RequestStatus};
use crate::session::SessionState;

pub(crate) fn delivery_seed(config: &OfferConfig, driver_index: u32, request: RequestId) -> u64 {
    config
        .seed
        .wrapping_add(driver_index as u64)
        .wrapping_add(request.0.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

pub(crate) fn sample_km<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

pub(crate) fn eta_minutes(pickup_km: f64, minutes_per_km: f64) -> u32 {
    ((pickup_km * minutes_per_km).floor() as u32).saturating_add(1).max(1)
}

pub fn deliver_offer_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut session: ResMut<SessionState>,
    pricing: Res<PricingConfig>,
    config: Res<OfferConfig>,
    drivers: Query<&Driver>,
    offers: Query<&Offer>,
) {
    if event.0.kind != EventKind::DeliverOffer {
        return;
    }
    let Some(EventSubject::Offer { driver: driver_entity, request }) = event.0.subject else {
        return;
    };

    // Revocation already dropped deliveries for superseded requests; this
    // guard catches anything popped in the same step.
    let Some(active) = session.active_request.as_mut() else {
        return;
    };
    if active.id != request {
        return;
    }

    let Ok(driver) = drivers.get(driver_entity) else {
        return;
    };
    // Eligibility is re-checked at delivery time: the driver may have gone
    // offline while the delivery was pending.
    if !driver.is_online || driver.vehicle.kind != active.vehicle_kind {
        return;
    }
    // One offer per driver per request; a manual proposal from this driver
    // may already be on the table.
    let offer_id = OfferId {
        request,
        driver: driver.profile.id,
    };
    if offers.iter().any(|offer| offer.id == offer_id) {
        return;
    }

    let mut rng = StdRng::seed_from_u64(delivery_seed(&config, driver_entity.index(), request));
    let trip_km = sample_km(&mut rng, config.min_trip_km, config.max_trip_km);
    let pickup_km = sample_km(&mut rng, config.min_pickup_km, config.max_pickup_km);

    let mut fare = compute_fare(trip_km + pickup_km, active.vehicle_kind, &pricing);
    if rng.gen::<f64>() < config.markup_probability {
        fare *= config.markup_factor;
    }

    let offer = Offer {
        id: offer_id,
        driver: driver_entity,
        fare,
        eta_minutes: eta_minutes(pickup_km, config.eta_minutes_per_km),
    };
    commands.spawn(offer);
    active.status = RequestStatus::OffersReceived;

    tracing::debug!(
        driver = %driver.profile.name,
        request = request.0,
        fare,
        eta_minutes = offer.eta_minutes,
        "offer delivered"
    );
}
