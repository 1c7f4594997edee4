mod support;

use rota_core::error::SessionError;
use rota_core::request::RequestStatus;
use rota_core::ride::RideStatus;
use rota_core::screen::Screen;
use rota_core::users::VehicleType;

use support::{login, SessionBuilder, ANA_PHONE, CARLOS_PHONE, MARIANA_PHONE};

#[test]
fn eligible_drivers_answer_with_staggered_offers() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
        .expect("request");

    let snapshot = app.snapshot();
    let request = snapshot.request.as_ref().expect("active request");
    assert_eq!(request.status, RequestStatus::Searching);
    assert!(snapshot.offers.is_empty());

    // Two car drivers are online; one offer lands per stagger interval.
    app.advance_secs(2);
    assert_eq!(app.snapshot().offers.len(), 1);
    app.advance_secs(2);

    let snapshot = app.snapshot();
    assert_eq!(snapshot.offers.len(), 2);
    assert_eq!(
        snapshot.request.as_ref().map(|r| r.status),
        Some(RequestStatus::OffersReceived)
    );
    for offer in &snapshot.offers {
        assert_eq!(offer.vehicle.kind, VehicleType::Car);
        assert!(offer.fare >= snapshot.pricing.car.min_fare);
        assert!(offer.eta_minutes >= 1);
    }
}

#[test]
fn moto_request_with_only_car_drivers_online_yields_no_offers() {
    let mut app = SessionBuilder::new().build_logged_in(MARIANA_PHONE);
    app.toggle_driver_online(false).expect("toggle");

    login(&mut app, ANA_PHONE);
    app.create_ride_request("Mercado Municipal", VehicleType::Moto)
        .expect("request");
    app.advance_secs(60);

    let snapshot = app.snapshot();
    assert!(snapshot.offers.is_empty());
    assert_eq!(
        snapshot.request.as_ref().map(|r| r.status),
        Some(RequestStatus::Searching)
    );

    // The search never resolves on its own; cancelling must still work.
    app.cancel_search().expect("cancel");
    assert!(app.snapshot().request.is_none());
}

#[test]
fn superseding_a_request_suppresses_its_pending_offers() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    let first = app
        .create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
        .expect("first request");
    app.advance_secs(2);
    assert_eq!(app.snapshot().offers.len(), 1);

    let second = app
        .create_ride_request("Parque Ibirapuera", VehicleType::Car)
        .expect("second request");
    assert!(app.snapshot().offers.is_empty(), "old offers must be cleared");

    app.advance_secs(60);
    let snapshot = app.snapshot();
    assert_eq!(snapshot.offers.len(), 2);
    for offer in &snapshot.offers {
        assert_eq!(offer.id.request, second);
        assert_ne!(offer.id.request, first);
    }
}

#[test]
fn accepting_an_offer_starts_exactly_one_ride_atomically() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
        .expect("request");
    app.advance_secs(2);

    let offers = app.snapshot().offers;
    assert_eq!(offers.len(), 1, "second delivery still pending");
    let accepted = &offers[0];
    app.accept_offer(accepted.id).expect("accept");

    let snapshot = app.snapshot();
    let ride = snapshot.ride.as_ref().expect("active ride");
    assert_eq!(ride.status, RideStatus::Accepted);
    assert_eq!(ride.fare, accepted.fare);
    assert!(snapshot.request.is_none());
    assert!(snapshot.offers.is_empty());
    assert_eq!(snapshot.screen, Screen::RideInProgress);

    // The pending second delivery was revoked with the request.
    assert_eq!(app.run_until_idle(100), 0);
    assert!(app.snapshot().offers.is_empty());
}

#[test]
fn accepting_a_stale_offer_is_rejected_without_mutation() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
        .expect("first request");
    app.advance_secs(2);
    let stale = app.snapshot().offers[0].id;

    let second = app
        .create_ride_request("Parque Ibirapuera", VehicleType::Car)
        .expect("second request");

    assert_eq!(app.accept_offer(stale), Err(SessionError::OfferExpired));
    let snapshot = app.snapshot();
    assert!(snapshot.ride.is_none());
    assert_eq!(snapshot.request.as_ref().map(|r| r.id), Some(second));
}

#[test]
fn markup_when_applied_raises_the_fare_by_exactly_fifteen_percent() {
    let base_offer = {
        let mut app = SessionBuilder::new()
            .with_markup_probability(0.0)
            .build_logged_in(ANA_PHONE);
        app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
            .expect("request");
        app.advance_secs(2);
        app.snapshot().offers[0].clone()
    };
    let marked_up_offer = {
        let mut app = SessionBuilder::new()
            .with_markup_probability(1.0)
            .build_logged_in(ANA_PHONE);
        app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
            .expect("request");
        app.advance_secs(2);
        app.snapshot().offers[0].clone()
    };

    // Same seed, so the distance draws match; only the markup differs.
    assert_eq!(base_offer.id, marked_up_offer.id);
    assert_eq!(base_offer.eta_minutes, marked_up_offer.eta_minutes);
    let ratio = marked_up_offer.fare / base_offer.fare;
    assert!(
        (ratio - 1.15).abs() < 1e-9,
        "expected exactly +15%, got ratio {ratio}"
    );
}

#[test]
fn short_trips_are_charged_the_minimum_fare() {
    let mut app = SessionBuilder::new()
        .with_markup_probability(0.0)
        .with_trip_range_km(0.1, 0.2)
        .with_pickup_range_km(0.1, 0.2)
        .build_logged_in(ANA_PHONE);
    app.create_ride_request("Praça da Sé", VehicleType::Car)
        .expect("request");
    app.advance_secs(60);

    let snapshot = app.snapshot();
    assert!(!snapshot.offers.is_empty());
    for offer in &snapshot.offers {
        assert_eq!(offer.fare, snapshot.pricing.car.min_fare);
    }
}

#[test]
fn driver_counter_proposal_lands_as_a_real_offer() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    app.create_ride_request("Mercado Municipal", VehicleType::Moto)
        .expect("request");

    // Mariana rides a moto and is eligible; her proposal is delivered.
    login(&mut app, MARIANA_PHONE);
    app.submit_driver_offer(31.5).expect("proposal");

    // Carlos drives a car; his proposal against a moto request is ignored.
    login(&mut app, CARLOS_PHONE);
    app.submit_driver_offer(10.0).expect("ignored proposal");

    login(&mut app, ANA_PHONE);
    let snapshot = app.snapshot();
    assert_eq!(snapshot.offers.len(), 1);
    assert_eq!(snapshot.offers[0].fare, 31.5);
    assert_eq!(snapshot.offers[0].driver_name, "Mariana");
    assert_eq!(
        snapshot.request.as_ref().map(|r| r.status),
        Some(RequestStatus::OffersReceived)
    );

    // The scheduled delivery from the same driver must not duplicate it.
    app.advance_secs(60);
    let snapshot = app.snapshot();
    assert_eq!(snapshot.offers.len(), 1);
    assert_eq!(snapshot.offers[0].fare, 31.5);
}

#[test]
fn non_positive_driver_proposals_are_rejected() {
    let mut app = SessionBuilder::new().build_logged_in(ANA_PHONE);
    app.create_ride_request("Mercado Municipal", VehicleType::Moto)
        .expect("request");

    login(&mut app, MARIANA_PHONE);
    assert_eq!(app.submit_driver_offer(0.0), Err(SessionError::InvalidFare));
    assert_eq!(
        app.submit_driver_offer(f64::NAN),
        Err(SessionError::InvalidFare)
    );

    login(&mut app, ANA_PHONE);
    assert!(app.snapshot().offers.is_empty());
}
