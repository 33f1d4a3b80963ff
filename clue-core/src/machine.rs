use clue_types::{CardId, UserState};

use crate::Action;

/// Sub-state of the in-game screens: full board
pub const FULL_VIEW: i32 = 0;
/// Sub-state of the in-game screens: compact board
pub const COMPACT_VIEW: i32 = 1;

/// Outcome of feeding one action to a user's current state
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Malformed or unexpected input: re-render the current state unchanged
    Ignore,
    /// Same state, new sub-state (paging, board view toggle)
    SubState(i32),
    Go(Move),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Move {
    Navigate(UserState),
    JoinRoom(i32),
    LeaveRoom,
    /// Wait for stragglers or start right away
    StartMatch,
    EnterGame,
    ThrowDice,
    SelectPlace,
    MoveTo(CardId),
    Suspect(CardId),
    Arm(CardId),
    Suspicion,
    Accusation,
}

impl Move {
    /// State the user lands in. `None` when it depends on the room.
    pub fn target(&self) -> Option<UserState> {
        match self {
            Move::Navigate(state) => Some(*state),
            Move::JoinRoom(_) => Some(UserState::Room),
            Move::LeaveRoom => Some(UserState::Rooms),
            Move::StartMatch => None,
            Move::EnterGame => Some(UserState::Game),
            Move::ThrowDice => Some(UserState::ThrowDice),
            Move::SelectPlace => Some(UserState::SelectPlace),
            Move::MoveTo(_) => Some(UserState::AccusePerson),
            Move::Suspect(_) => Some(UserState::AccuseWeapon),
            Move::Arm(_) => Some(UserState::ConfirmAccuse),
            Move::Suspicion => Some(UserState::CheckSuspicion),
            Move::Accusation => Some(UserState::CheckAccuse),
        }
    }

    /// Moves that act on the game and are reserved for the turn holder
    pub fn is_turn_action(&self) -> bool {
        matches!(
            self,
            Move::ThrowDice
                | Move::SelectPlace
                | Move::MoveTo(_)
                | Move::Suspect(_)
                | Move::Arm(_)
                | Move::Suspicion
                | Move::Accusation
        )
    }

    /// Moves that start a screen afresh rather than carry the board view
    pub fn resets_substate(&self) -> bool {
        matches!(
            self,
            Move::Navigate(_) | Move::JoinRoom(_) | Move::LeaveRoom | Move::StartMatch | Move::EnterGame
        )
    }
}

fn id_at_least(id: i64, floor: i64) -> Option<CardId> {
    if id >= floor {
        CardId::try_from(id).ok()
    } else {
        None
    }
}

fn paging(substate: i32, action: &Action) -> Option<Step> {
    match action {
        Action::Next => Some(Step::SubState(substate.saturating_add(1))),
        Action::Prev => Some(Step::SubState((substate - 1).max(0))),
        Action::Home => Some(Step::SubState(0)),
        Action::ToRules => Some(Step::Go(Move::Navigate(UserState::Rules))),
        Action::ToGreeting => Some(Step::Go(Move::Navigate(UserState::Greeting))),
        Action::ToRooms => Some(Step::Go(Move::Navigate(UserState::Rooms))),
        Action::ToExit => Some(Step::Go(Move::Navigate(UserState::Exit))),
        _ => None,
    }
}

fn board_view(action: &Action) -> Option<Step> {
    match action {
        Action::HideState => Some(Step::SubState(COMPACT_VIEW)),
        Action::ShowState => Some(Step::SubState(FULL_VIEW)),
        Action::ToRoom => Some(Step::Go(Move::Navigate(UserState::Room))),
        _ => None,
    }
}

/// The whole state graph. Pure: what the step does to rooms and games is
/// up to the session applier.
pub fn transition(state: UserState, substate: i32, action: &Action) -> Step {
    let step = match state {
        UserState::Greeting | UserState::Rules => paging(substate, action),
        UserState::Rooms => match action {
            Action::Room(id) => id_at_least(*id, 1).map(|id| Step::Go(Move::JoinRoom(id))),
            other => paging(substate, other),
        },
        UserState::Room => match action {
            Action::ToRooms => Some(Step::Go(Move::LeaveRoom)),
            Action::Room(id) if *id > 0 => Some(Step::Go(Move::StartMatch)),
            _ => None,
        },
        UserState::GameWaiting => match action {
            Action::ToRoom => Some(Step::Go(Move::Navigate(UserState::Room))),
            Action::ToGame => Some(Step::Go(Move::EnterGame)),
            _ => None,
        },
        UserState::Game | UserState::CheckSuspicion => match action {
            Action::ThrowDice => Some(Step::Go(Move::ThrowDice)),
            other => board_view(other),
        },
        UserState::ThrowDice => match action {
            Action::SelectPlace => Some(Step::Go(Move::SelectPlace)),
            other => board_view(other),
        },
        UserState::SelectPlace => match action {
            Action::NewLocation(id) => id_at_least(*id, 0).map(|id| Step::Go(Move::MoveTo(id))),
            other => board_view(other),
        },
        UserState::AccusePerson => match action {
            Action::AccusedPerson(id) => id_at_least(*id, 0).map(|id| Step::Go(Move::Suspect(id))),
            other => board_view(other),
        },
        UserState::AccuseWeapon => match action {
            Action::AccusedWeapon(id) => id_at_least(*id, 0).map(|id| Step::Go(Move::Arm(id))),
            other => board_view(other),
        },
        UserState::ConfirmAccuse => match action {
            Action::Suspicion => Some(Step::Go(Move::Suspicion)),
            Action::Accuse(n) if *n >= 0 => Some(Step::Go(Move::Accusation)),
            other => board_view(other),
        },
        UserState::CheckAccuse => board_view(action),
        UserState::Exit => Some(Step::Go(Move::Navigate(UserState::Greeting))),
    };

    step.unwrap_or(Step::Ignore)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(state: UserState, substate: i32, payload: &str) -> Step {
        transition(state, substate, &Action::parse(payload))
    }

    #[test]
    fn test_paging_floors_at_zero() {
        assert_eq!(step(UserState::Greeting, 0, "next"), Step::SubState(1));
        assert_eq!(step(UserState::Rules, 3, "prev"), Step::SubState(2));
        assert_eq!(step(UserState::Rules, 0, "prev"), Step::SubState(0));
        assert_eq!(step(UserState::Greeting, 4, "home"), Step::SubState(0));
        assert_eq!(
            step(UserState::Greeting, 2, "to_rules"),
            Step::Go(Move::Navigate(UserState::Rules))
        );
    }

    #[test]
    fn test_rooms_requires_positive_room() {
        assert_eq!(step(UserState::Rooms, 0, r#"{"room": 2}"#), Step::Go(Move::JoinRoom(2)));
        assert_eq!(step(UserState::Rooms, 1, r#"{"room": -1}"#), Step::Ignore);
        assert_eq!(step(UserState::Rooms, 1, r#"{"room": 0}"#), Step::Ignore);
        assert_eq!(step(UserState::Rooms, 1, "garbage"), Step::Ignore);
    }

    #[test]
    fn test_room_and_waiting() {
        assert_eq!(step(UserState::Room, 0, "to_rooms"), Step::Go(Move::LeaveRoom));
        assert_eq!(step(UserState::Room, 0, r#"{"room": 1}"#), Step::Go(Move::StartMatch));
        assert_eq!(step(UserState::Room, 0, "next"), Step::Ignore);
        assert_eq!(step(UserState::GameWaiting, 0, "to_game"), Step::Go(Move::EnterGame));
        assert_eq!(
            step(UserState::GameWaiting, 0, "to_room"),
            Step::Go(Move::Navigate(UserState::Room))
        );
        assert_eq!(Move::StartMatch.target(), None);
    }

    #[test]
    fn test_turn_sequence() {
        assert_eq!(step(UserState::Game, 0, "throw_dice"), Step::Go(Move::ThrowDice));
        assert_eq!(step(UserState::ThrowDice, 0, "select_place"), Step::Go(Move::SelectPlace));
        assert_eq!(
            step(UserState::SelectPlace, 0, r#"{"new_location": 4}"#),
            Step::Go(Move::MoveTo(4))
        );
        assert_eq!(
            step(UserState::AccusePerson, 0, r#"{"accused_person": 2}"#),
            Step::Go(Move::Suspect(2))
        );
        assert_eq!(
            step(UserState::AccuseWeapon, 0, r#"{"accused_weapon": 5}"#),
            Step::Go(Move::Arm(5))
        );
        assert_eq!(
            step(UserState::ConfirmAccuse, 0, r#"{"suspiction": {}}"#),
            Step::Go(Move::Suspicion)
        );
        assert_eq!(
            step(UserState::ConfirmAccuse, 0, r#"{"accuse": 1}"#),
            Step::Go(Move::Accusation)
        );
        assert_eq!(step(UserState::CheckSuspicion, 0, "throw_dice"), Step::Go(Move::ThrowDice));
    }

    #[test]
    fn test_negative_ids_are_ignored() {
        assert_eq!(step(UserState::SelectPlace, 0, r#"{"new_location": -1}"#), Step::Ignore);
        assert_eq!(step(UserState::AccusePerson, 0, r#"{"accused_person": -3}"#), Step::Ignore);
        assert_eq!(step(UserState::ConfirmAccuse, 0, r#"{"accuse": -1}"#), Step::Ignore);
        assert_eq!(step(UserState::ThrowDice, 1, "throw_dice"), Step::Ignore);
    }

    #[test]
    fn test_board_view_toggle() {
        for state in [UserState::Game, UserState::ThrowDice, UserState::CheckAccuse] {
            assert_eq!(step(state, 0, "hide_state"), Step::SubState(COMPACT_VIEW));
            assert_eq!(step(state, 1, "show_state"), Step::SubState(FULL_VIEW));
        }
        assert_eq!(
            step(UserState::CheckAccuse, 0, "to_room"),
            Step::Go(Move::Navigate(UserState::Room))
        );
    }

    #[test]
    fn test_exit_returns_to_greeting() {
        assert_eq!(
            step(UserState::Exit, 0, "anything"),
            Step::Go(Move::Navigate(UserState::Greeting))
        );
    }
}
