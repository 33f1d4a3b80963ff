use clue_types::{User, UserId, UserState};

use crate::Seat;

/// Occupants that have not reached GAME_WAITING yet, the caller aside.
/// No timeout and no quorum: an empty result means the match can start.
pub fn players_not_ready(occupants: &[User], excluding: UserId) -> Vec<&User> {
    occupants
        .iter()
        .filter(|u| u.id != excluding && u.state != UserState::GameWaiting)
        .collect()
}

/// Everyone bound to the room is dealt in, ordered by user id
pub fn seats_for(user: &User, others: &[User]) -> Vec<Seat> {
    let mut seats: Vec<Seat> = std::iter::once(user)
        .chain(others.iter().filter(|u| u.id != user.id))
        .map(|u| Seat::new(u.id, u.name.clone()))
        .collect();
    seats.sort_by_key(|s| s.user_id);
    seats
}
