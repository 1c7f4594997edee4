//! Scripted passenger journey: login, request, accept an offer, ride to
//! completion. Prints the session snapshot after the interesting steps.
//!
//! Run with: `cargo run --example session_walkthrough`

use rota_core::controller::SessionController;
use rota_core::ride::RideStatus;
use rota_core::scenario::{SessionParams, ANA_PHONE, CARLOS_PHONE};
use rota_core::users::VehicleType;

fn print_snapshot(label: &str, controller: &mut SessionController) {
    let snapshot = controller.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).expect("snapshot serializes");
    println!("--- {label} ---\n{json}\n");
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut app = SessionController::with_params(SessionParams::default().with_seed(7));

    app.login(ANA_PHONE, "1234").expect("login");
    app.create_ride_request("Avenida Paulista, 1000", VehicleType::Car)
        .expect("ride request");
    print_snapshot("searching", &mut app);

    // Let both car drivers answer.
    app.advance_secs(4);
    print_snapshot("offers received", &mut app);

    let offer = app.snapshot().offers[0].id;
    app.accept_offer(offer).expect("accept offer");
    print_snapshot("ride accepted", &mut app);

    // The driver side advances the ride.
    app.login(CARLOS_PHONE, "1234").expect("driver login");
    app.update_ride_status(RideStatus::InProgress)
        .expect("start ride");
    app.update_ride_status(RideStatus::Completed)
        .expect("finish ride");
    print_snapshot("completed", &mut app);

    // After the grace period the session is back on the home screen.
    app.advance_secs(3);
    print_snapshot("back home", &mut app);
}
