//! Session runner: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SessionClock], inserts it as
//! [CurrentEvent], then runs the schedule.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, EventKind, SessionClock};
use crate::systems::{clear_ride::clear_ride_system, deliver_offer::deliver_offer_system};

fn is_deliver_offer(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DeliverOffer)
        .unwrap_or(false)
}

fn is_clear_ride(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ClearRide)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then
/// runs the schedule. Returns `false` when the clock is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SessionClock>().pop_next() {
        Some(event) => event,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the session schedule: event-reacting systems plus [apply_deferred]
/// so spawned offers are applied before the next step.
pub fn session_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        deliver_offer_system.run_if(is_deliver_offer),
        clear_ride_system.run_if(is_clear_ride),
        apply_deferred,
    ));
    schedule
}
