use bevy_ecs::prelude::Entity;
use serde::Serialize;

use crate::users::{RideLocation, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RideId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RideStatus {
    Accepted,
    DriverArriving,
    InProgress,
    Completed,
    CancelledByPassenger,
    CancelledByDriver,
}

impl RideStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RideStatus::Completed
                | RideStatus::CancelledByPassenger
                | RideStatus::CancelledByDriver
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(
            self,
            RideStatus::CancelledByPassenger | RideStatus::CancelledByDriver
        )
    }

    fn progress_rank(self) -> u8 {
        match self {
            RideStatus::Accepted => 0,
            RideStatus::DriverArriving => 1,
            RideStatus::InProgress => 2,
            RideStatus::Completed => 3,
            RideStatus::CancelledByPassenger | RideStatus::CancelledByDriver => 4,
        }
    }

    /// Forward transitions are strictly monotone (skipping intermediate
    /// states is allowed); cancellation is reachable from any non-terminal
    /// state; terminal states accept nothing.
    pub fn can_transition_to(self, next: RideStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next.is_cancelled() {
            return true;
        }
        next.progress_rank() > self.progress_rank()
    }
}

/// The accepted engagement between one passenger and one driver. The fare is
/// fixed when the offer is accepted and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub id: RideId,
    pub passenger: UserId,
    pub driver: Entity,
    pub from: RideLocation,
    pub to: RideLocation,
    pub fare: f64,
    pub status: RideStatus,
    /// Session clock time when the ride entered InProgress (ms).
    pub started_at_ms: Option<u64>,
    /// Session clock time when the ride entered Completed (ms).
    pub completed_at_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_monotone() {
        assert!(RideStatus::Accepted.can_transition_to(RideStatus::DriverArriving));
        assert!(RideStatus::Accepted.can_transition_to(RideStatus::InProgress));
        assert!(RideStatus::Accepted.can_transition_to(RideStatus::Completed));
        assert!(RideStatus::DriverArriving.can_transition_to(RideStatus::InProgress));
        assert!(RideStatus::InProgress.can_transition_to(RideStatus::Completed));

        assert!(!RideStatus::InProgress.can_transition_to(RideStatus::DriverArriving));
        assert!(!RideStatus::DriverArriving.can_transition_to(RideStatus::Accepted));
        assert!(!RideStatus::InProgress.can_transition_to(RideStatus::InProgress));
    }

    #[test]
    fn cancellation_is_reachable_from_any_non_terminal_state() {
        for state in [
            RideStatus::Accepted,
            RideStatus::DriverArriving,
            RideStatus::InProgress,
        ] {
            assert!(state.can_transition_to(RideStatus::CancelledByPassenger));
            assert!(state.can_transition_to(RideStatus::CancelledByDriver));
        }
    }

    #[test]
    fn terminal_states_accept_no_transitions() {
        for terminal in [
            RideStatus::Completed,
            RideStatus::CancelledByPassenger,
            RideStatus::CancelledByDriver,
        ] {
            for next in [
                RideStatus::Accepted,
                RideStatus::DriverArriving,
                RideStatus::InProgress,
                RideStatus::Completed,
                RideStatus::CancelledByPassenger,
                RideStatus::CancelledByDriver,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
