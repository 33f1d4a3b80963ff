use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ChatId, GameId, MessageId, RoomId, UserId};

/// Persisted session state of a chat user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserState {
    #[default]
    Greeting,
    Rules,
    Rooms,
    Room,
    GameWaiting,
    Game,
    ThrowDice,
    SelectPlace,
    AccusePerson,
    AccuseWeapon,
    ConfirmAccuse,
    #[serde(rename = "CHECK_SUSPICTION")]
    CheckSuspicion,
    CheckAccuse,
    Exit,
}

impl UserState {
    pub const ALL: [UserState; 14] = [
        Self::Greeting,
        Self::Rules,
        Self::Rooms,
        Self::Room,
        Self::GameWaiting,
        Self::Game,
        Self::ThrowDice,
        Self::SelectPlace,
        Self::AccusePerson,
        Self::AccuseWeapon,
        Self::ConfirmAccuse,
        Self::CheckSuspicion,
        Self::CheckAccuse,
        Self::Exit,
    ];

    /// Name stored in the user row and used as the content lookup key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "GREETING",
            Self::Rules => "RULES",
            Self::Rooms => "ROOMS",
            Self::Room => "ROOM",
            Self::GameWaiting => "GAME_WAITING",
            Self::Game => "GAME",
            Self::ThrowDice => "THROW_DICE",
            Self::SelectPlace => "SELECT_PLACE",
            Self::AccusePerson => "ACCUSE_PERSON",
            Self::AccuseWeapon => "ACCUSE_WEAPON",
            Self::ConfirmAccuse => "CONFIRM_ACCUSE",
            Self::CheckSuspicion => "CHECK_SUSPICTION",
            Self::CheckAccuse => "CHECK_ACCUSE",
            Self::Exit => "EXIT",
        }
    }

    /// Unknown or corrupt names fall back to GREETING
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == name)
            .unwrap_or_default()
    }

    /// States that render the shared game board
    pub fn is_in_game(&self) -> bool {
        matches!(
            self,
            Self::Game
                | Self::ThrowDice
                | Self::SelectPlace
                | Self::AccusePerson
                | Self::AccuseWeapon
                | Self::ConfirmAccuse
                | Self::CheckSuspicion
                | Self::CheckAccuse
        )
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub chat_id: ChatId,
    pub state: UserState,
    /// Page index within content screens, compact/full toggle on the board
    pub substate: i32,
    pub room_id: Option<RoomId>,
    pub last_message_id: Option<MessageId>,
}

impl User {
    /// Soft reset used by the dispatcher after a failed transition
    pub fn reset(&mut self) {
        self.state = UserState::Greeting;
        self.substate = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub game_id: Option<GameId>,
}
