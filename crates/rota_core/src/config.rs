use bevy_ecs::prelude::Resource;

/// Offer generation tuning. The distance ranges, markup odds and stagger
/// pacing mirror the mocked marketplace; none of them are domain rules.
#[derive(Debug, Clone, Copy, Resource)]
pub struct OfferConfig {
    /// Simulated trip distance range in km, sampled uniformly.
    pub min_trip_km: f64,
    pub max_trip_km: f64,
    /// Simulated driver-to-pickup distance range in km, sampled uniformly.
    pub min_pickup_km: f64,
    pub max_pickup_km: f64,
    /// Delay between consecutive driver offers; driver N delivers after
    /// `(N + 1) * stagger_secs`.
    pub stagger_secs: u64,
    /// Probability (0.0-1.0) that a driver marks the base fare up.
    pub markup_probability: f64,
    /// Multiplier applied when the markup triggers.
    pub markup_factor: f64,
    /// ETA slope: minutes per km of pickup distance, floored, minimum 1.
    pub eta_minutes_per_km: f64,
    /// Seed for RNG (for reproducibility).
    pub seed: u64,
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            min_trip_km: 2.0,
            max_trip_km: 17.0,
            min_pickup_km: 1.0,
            max_pickup_km: 4.0,
            stagger_secs: 2,
            markup_probability: 0.3,
            markup_factor: 1.15,
            eta_minutes_per_km: 2.5,
            seed: 0,
        }
    }
}

/// Ride lifecycle tuning.
#[derive(Debug, Clone, Copy, Resource)]
pub struct RideFlowConfig {
    /// How long a completed ride stays visible before the session returns to
    /// the home screen.
    pub completed_display_secs: u64,
}

impl Default for RideFlowConfig {
    fn default() -> Self {
        Self {
            completed_display_secs: 3,
        }
    }
}
