pub mod auth;
pub mod clock;
pub mod config;
pub mod controller;
pub mod ecs;
pub mod error;
pub mod pricing;
pub mod request;
pub mod ride;
pub mod runner;
pub mod scenario;
pub mod screen;
pub mod session;
pub mod snapshot;
pub mod systems;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
pub mod users;
