//! Role dealing and turn order.
//!
//! Both functions are pure: everything they need comes in through their
//! arguments, including the random source. The state machine passes a
//! thread-local RNG; tests pass a seeded `StdRng`.

use impostor_protocol::{PlayerName, Role};
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;

use crate::RoomError;

/// Deals roles for a roster of `players` with exactly `impostors`
/// impostors.
///
/// The impostor seats are a uniform sample without replacement from
/// `0..players`, so every one of the `C(players, impostors)` seatings is
/// equally likely. Position `i` of the result is the role of roster
/// entry `i`.
///
/// # Errors
/// - [`RoomError::InvalidConfig`] if `impostors` is 0.
/// - [`RoomError::NotEnoughPlayers`] if `impostors >= players`.
pub fn assign_roles<R: Rng + ?Sized>(
    players: usize,
    impostors: usize,
    rng: &mut R,
) -> Result<Vec<Role>, RoomError> {
    if impostors == 0 {
        return Err(RoomError::InvalidConfig(
            "a round needs at least one impostor".into(),
        ));
    }
    if impostors >= players {
        return Err(RoomError::NotEnoughPlayers { players, impostors });
    }

    let mut roles = vec![Role::Native; players];
    for seat in index::sample(rng, players, impostors).iter() {
        roles[seat] = Role::Impostor;
    }
    Ok(roles)
}

/// Returns a uniformly random permutation of `names` (Fisher-Yates).
///
/// Draws from the RNG independently of [`assign_roles`]; the speaking
/// order says nothing about who the impostors are.
pub fn turn_order<R: Rng + ?Sized>(names: &[PlayerName], rng: &mut R) -> Vec<PlayerName> {
    let mut order = names.to_vec();
    order.shuffle(rng);
    order
}
