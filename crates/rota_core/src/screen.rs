//! Screen routing as a pure function of session state. The active screen is
//! derived, never stored, so a screen whose data is missing cannot be
//! reached.

use serde::Serialize;

use crate::session::SessionState;
use crate::users::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    Login,
    PassengerHome,
    DriverHome,
    AdminPanel,
    RideInProgress,
}

/// No identity routes to login; an active ride overrides the role home.
pub fn route(session: &SessionState) -> Screen {
    let Some(user) = &session.current_user else {
        return Screen::Login;
    };
    if session.active_ride.is_some() {
        return Screen::RideInProgress;
    }
    match user {
        CurrentUser::Admin(_) => Screen::AdminPanel,
        CurrentUser::Driver(_) => Screen::DriverHome,
        CurrentUser::Passenger(_) => Screen::PassengerHome,
    }
}
