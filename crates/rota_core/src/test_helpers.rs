//! Shared fixtures for unit and integration tests.

use crate::controller::SessionController;
use crate::ecs::OfferId;
use crate::scenario::{SessionParams, ANA_PHONE};

pub const ANY_CODE: &str = "1234";

/// A deterministic session with the mock roster, nobody logged in.
pub fn test_controller() -> SessionController {
    SessionController::with_params(SessionParams::default().with_seed(42))
}

/// A deterministic session logged in as the mock passenger Ana.
pub fn passenger_controller() -> SessionController {
    let mut controller = test_controller();
    controller
        .login(ANA_PHONE, ANY_CODE)
        .expect("mock passenger login");
    controller
}

/// Offer identities currently visible, in snapshot order.
pub fn visible_offer_ids(controller: &mut SessionController) -> Vec<OfferId> {
    controller
        .snapshot()
        .offers
        .iter()
        .map(|offer| offer.id)
        .collect()
}
