//! Mocked identity verification: any valid-looking phone plus any
//! confirmation code succeeds. Known phones resolve to roster identities,
//! the reserved literal resolves to the administrator, everything else mints
//! a new passenger.

use bevy_ecs::prelude::{Entity, World};

use crate::ecs::Driver;
use crate::error::{SessionError, SessionResult};
use crate::scenario::PassengerDirectory;
use crate::users::{CurrentUser, ProfileLevel, UserId, UserProfile};

pub const ADMIN_PHONE: &str = "00000000000";
pub const ADMIN_USER_ID: UserId = UserId(0);

const MIN_PHONE_DIGITS: usize = 10;
const MIN_CODE_LEN: usize = 4;

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn admin_profile() -> UserProfile {
    UserProfile {
        id: ADMIN_USER_ID,
        name: "Admin".to_string(),
        phone: ADMIN_PHONE.to_string(),
        rating: 5.0,
        level: ProfileLevel::Level3,
    }
}

/// Resolve a login attempt to an identity. Validation failures reject
/// without touching session state.
pub fn verify_login(world: &mut World, phone: &str, code: &str) -> SessionResult<CurrentUser> {
    let phone = digits(phone);
    if phone.len() < MIN_PHONE_DIGITS {
        return Err(SessionError::InvalidPhoneNumber);
    }
    if code.trim().len() < MIN_CODE_LEN {
        return Err(SessionError::InvalidConfirmationCode);
    }

    if phone == ADMIN_PHONE {
        return Ok(CurrentUser::Admin(admin_profile()));
    }

    let driver = world
        .query::<(Entity, &Driver)>()
        .iter(world)
        .find(|(_, driver)| driver.profile.phone == phone)
        .map(|(entity, _)| entity);
    if let Some(entity) = driver {
        return Ok(CurrentUser::Driver(entity));
    }

    let mut directory = world.resource_mut::<PassengerDirectory>();
    if let Some(passenger) = directory.find_by_phone(&phone) {
        return Ok(CurrentUser::Passenger(passenger.profile.id));
    }

    let minted = directory.register_new(phone);
    Ok(CurrentUser::Passenger(minted))
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::World;

    use super::*;
    use crate::scenario::{build_session, SessionParams, ANA_PHONE, CARLOS_PHONE};
    use crate::users::Role;

    fn session_world() -> World {
        let mut world = World::new();
        build_session(&mut world, SessionParams::default());
        world
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut world = session_world();
        assert_eq!(
            verify_login(&mut world, "119", "1234"),
            Err(SessionError::InvalidPhoneNumber)
        );
    }

    #[test]
    fn short_code_is_rejected() {
        let mut world = session_world();
        assert_eq!(
            verify_login(&mut world, ANA_PHONE, "12"),
            Err(SessionError::InvalidConfirmationCode)
        );
    }

    #[test]
    fn known_phones_resolve_to_their_roles() {
        let mut world = session_world();
        let ana = verify_login(&mut world, ANA_PHONE, "1234").expect("ana");
        assert_eq!(ana.role(), Role::Passenger);

        let carlos = verify_login(&mut world, CARLOS_PHONE, "1234").expect("carlos");
        assert_eq!(carlos.role(), Role::Driver);

        let admin = verify_login(&mut world, ADMIN_PHONE, "1234").expect("admin");
        assert_eq!(admin.role(), Role::Admin);
    }

    #[test]
    fn phone_formatting_is_ignored() {
        let mut world = session_world();
        let ana = verify_login(&mut world, "(11) 98765-4321", "1234").expect("ana");
        assert!(matches!(ana, CurrentUser::Passenger(UserId(1))));
    }

    #[test]
    fn unknown_phone_mints_a_new_passenger() {
        let mut world = session_world();
        let user = verify_login(&mut world, "11999990000", "1234").expect("new user");
        let CurrentUser::Passenger(id) = user else {
            panic!("expected passenger, got {user:?}");
        };

        let directory = world.resource::<PassengerDirectory>();
        let minted = directory.find(id).expect("registered passenger");
        assert_eq!(minted.profile.name, "Novo Usuário");
        assert_eq!(minted.profile.level, ProfileLevel::Level1);
        assert_eq!(minted.profile.rating, 5.0);
    }
}
