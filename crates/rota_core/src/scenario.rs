//! Session bootstrap: resources, the passenger directory and the mocked
//! roster the simulation ships with.

use bevy_ecs::prelude::{Resource, World};

use crate::clock::SessionClock;
use crate::config::{OfferConfig, RideFlowConfig};
use crate::ecs::{Driver, Position};
use crate::pricing::PricingConfig;
use crate::session::SessionState;
use crate::users::{
    GeoPoint, Passenger, ProfileLevel, UserId, UserProfile, Vehicle, VehicleType,
};

/// Pickup point used for passengers without a live location (São Paulo).
pub const DEFAULT_PICKUP: GeoPoint = GeoPoint {
    lat: -23.5505,
    lng: -46.6333,
};

pub const ANA_PHONE: &str = "11987654321";
pub const CARLOS_PHONE: &str = "11912345678";
pub const MARIANA_PHONE: &str = "11923456789";
pub const BRUNO_PHONE: &str = "11934567890";

/// Known passengers, mock seed data plus anyone minted at login.
#[derive(Debug, Resource)]
pub struct PassengerDirectory {
    passengers: Vec<Passenger>,
    next_user_id: u32,
}

impl Default for PassengerDirectory {
    fn default() -> Self {
        Self {
            passengers: Vec::new(),
            next_user_id: 1,
        }
    }
}

impl PassengerDirectory {
    pub fn find(&self, id: UserId) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.profile.id == id)
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.profile.phone == phone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.iter()
    }

    pub fn insert(&mut self, passenger: Passenger) {
        self.next_user_id = self.next_user_id.max(passenger.profile.id.0 + 1);
        self.passengers.push(passenger);
    }

    /// Mint a fresh level-1 passenger for an unknown phone number.
    pub fn register_new(&mut self, phone: String) -> UserId {
        let id = UserId(self.next_user_id);
        self.next_user_id += 1;
        self.passengers.push(Passenger {
            profile: UserProfile {
                id,
                name: "Novo Usuário".to_string(),
                phone,
                rating: 5.0,
                level: ProfileLevel::Level1,
            },
            location: DEFAULT_PICKUP,
        });
        id
    }
}

/// Builder-style parameters for a session world.
#[derive(Debug, Clone, Copy)]
pub struct SessionParams {
    pub seed: u64,
    pub pricing: PricingConfig,
    pub offers: OfferConfig,
    pub ride_flow: RideFlowConfig,
    pub with_mock_roster: bool,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            seed: 0,
            pricing: PricingConfig::default(),
            offers: OfferConfig::default(),
            ride_flow: RideFlowConfig::default(),
            with_mock_roster: true,
        }
    }
}

impl SessionParams {
    /// Override the RNG seed used by offer generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.offers.seed = seed.wrapping_add(0x0FFE_0FFE);
        self
    }

    pub fn with_pricing_config(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_offer_config(mut self, offers: OfferConfig) -> Self {
        self.offers = offers;
        self
    }

    pub fn with_ride_flow_config(mut self, ride_flow: RideFlowConfig) -> Self {
        self.ride_flow = ride_flow;
        self
    }

    /// Start from an empty roster; tests spawn their own actors.
    pub fn without_mock_roster(mut self) -> Self {
        self.with_mock_roster = false;
        self
    }
}

/// Populate `world` with every session resource and, unless disabled, the
/// mocked roster.
pub fn build_session(world: &mut World, params: SessionParams) {
    world.insert_resource(SessionClock::default());
    world.insert_resource(SessionState::default());
    world.insert_resource(params.pricing);
    world.insert_resource(params.offers);
    world.insert_resource(params.ride_flow);

    let mut directory = PassengerDirectory::default();
    if params.with_mock_roster {
        directory.insert(Passenger {
            profile: UserProfile {
                id: UserId(1),
                name: "Ana".to_string(),
                phone: ANA_PHONE.to_string(),
                rating: 4.8,
                level: ProfileLevel::Level3,
            },
            location: DEFAULT_PICKUP,
        });
    }
    world.insert_resource(directory);

    if params.with_mock_roster {
        spawn_mock_drivers(world);
    }
}

fn spawn_mock_drivers(world: &mut World) {
    world.spawn((
        Driver {
            profile: UserProfile {
                id: UserId(2),
                name: "Carlos".to_string(),
                phone: CARLOS_PHONE.to_string(),
                rating: 4.9,
                level: ProfileLevel::Level3,
            },
            vehicle: Vehicle {
                model: "Honda Civic".to_string(),
                plate: "BRA1Z23".to_string(),
                kind: VehicleType::Car,
            },
            is_online: true,
        },
        Position(GeoPoint {
            lat: -23.551,
            lng: -46.634,
        }),
    ));
    world.spawn((
        Driver {
            profile: UserProfile {
                id: UserId(3),
                name: "Mariana".to_string(),
                phone: MARIANA_PHONE.to_string(),
                rating: 4.85,
                level: ProfileLevel::Level2,
            },
            vehicle: Vehicle {
                model: "Yamaha Fazer".to_string(),
                plate: "BRA3Y45".to_string(),
                kind: VehicleType::Moto,
            },
            is_online: true,
        },
        Position(GeoPoint {
            lat: -23.549,
            lng: -46.632,
        }),
    ));
    world.spawn((
        Driver {
            profile: UserProfile {
                id: UserId(4),
                name: "Bruno".to_string(),
                phone: BRUNO_PHONE.to_string(),
                rating: 4.95,
                level: ProfileLevel::Level3,
            },
            vehicle: Vehicle {
                model: "Toyota Corolla".to_string(),
                plate: "BRA5X67".to_string(),
                kind: VehicleType::Car,
            },
            is_online: true,
        },
        Position(GeoPoint {
            lat: -23.555,
            lng: -46.639,
        }),
    ));
}
