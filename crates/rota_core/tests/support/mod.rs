#![allow(dead_code)]

use rota_core::config::{OfferConfig, RideFlowConfig};
use rota_core::controller::SessionController;
use rota_core::pricing::PricingConfig;
use rota_core::scenario::SessionParams;

pub use rota_core::scenario::{ANA_PHONE, BRUNO_PHONE, CARLOS_PHONE, MARIANA_PHONE};

pub const ANY_CODE: &str = "1234";
pub const ADMIN_PHONE: &str = rota_core::auth::ADMIN_PHONE;

/// Builder for reproducible test sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionBuilder {
    params: SessionParams,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            params: SessionParams::default().with_seed(42),
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params = self.params.with_seed(seed);
        self
    }

    pub fn with_pricing_config(mut self, pricing: PricingConfig) -> Self {
        self.params = self.params.with_pricing_config(pricing);
        self
    }

    pub fn with_offer_config(mut self, offers: OfferConfig) -> Self {
        self.params.offers = OfferConfig {
            seed: self.params.offers.seed,
            ..offers
        };
        self
    }

    pub fn with_markup_probability(mut self, probability: f64) -> Self {
        self.params.offers.markup_probability = probability;
        self
    }

    pub fn with_trip_range_km(mut self, min: f64, max: f64) -> Self {
        self.params.offers.min_trip_km = min;
        self.params.offers.max_trip_km = max;
        self
    }

    pub fn with_pickup_range_km(mut self, min: f64, max: f64) -> Self {
        self.params.offers.min_pickup_km = min;
        self.params.offers.max_pickup_km = max;
        self
    }

    pub fn with_completed_display_secs(mut self, secs: u64) -> Self {
        self.params.ride_flow = RideFlowConfig {
            completed_display_secs: secs,
        };
        self
    }

    pub fn build(self) -> SessionController {
        SessionController::with_params(self.params)
    }

    /// Build and log in as `phone` in one step.
    pub fn build_logged_in(self, phone: &str) -> SessionController {
        let mut controller = self.build();
        login(&mut controller, phone);
        controller
    }
}

pub fn login(controller: &mut SessionController, phone: &str) {
    controller
        .login(phone, ANY_CODE)
        .unwrap_or_else(|error| panic!("login as {phone} failed: {error}"));
}
