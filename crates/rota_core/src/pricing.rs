//! Fare rules: per-km rate with a per-vehicle minimum fare floor.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::users::VehicleType;

/// Rates for one vehicle type. The hourly floor is stored for payout rules
/// and is not applied by fare computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleRates {
    pub per_km_rate: f64,
    pub min_fare: f64,
    pub min_hourly_rate: f64,
}

/// Admin-managed pricing table, one rate set per vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct PricingConfig {
    pub car: VehicleRates,
    pub moto: VehicleRates,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            car: VehicleRates {
                per_km_rate: 2.0,
                min_fare: 8.0,
                min_hourly_rate: 40.0,
            },
            moto: VehicleRates {
                per_km_rate: 1.5,
                min_fare: 5.0,
                min_hourly_rate: 25.0,
            },
        }
    }
}

impl PricingConfig {
    pub fn rates_for(&self, kind: VehicleType) -> VehicleRates {
        match kind {
            VehicleType::Car => self.car,
            VehicleType::Moto => self.moto,
        }
    }

    /// All six fields must be finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.car, self.moto].iter().all(|rates| {
            [rates.per_km_rate, rates.min_fare, rates.min_hourly_rate]
                .iter()
                .all(|value| value.is_finite() && *value >= 0.0)
        })
    }
}

/// Calculate the fare for a trip of `distance_km` with the given vehicle type.
///
/// Formula: `fare = max(distance_km * per_km_rate, min_fare)`.
///
/// Non-finite or negative distances clamp to zero, so the result is never
/// below the configured minimum fare.
pub fn compute_fare(distance_km: f64, kind: VehicleType, config: &PricingConfig) -> f64 {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    let rates = config.rates_for(kind);
    (distance_km * rates.per_km_rate).max(rates.min_fare)
}
