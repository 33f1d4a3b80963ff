use clue_types::{Card, UserId, UserState};

/// One card shown to the accuser during a suspicion
#[derive(Debug, Clone, PartialEq)]
pub struct Refutation {
    pub user_id: UserId,
    pub player_number: usize,
    pub card: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccusationOutcome {
    Correct,
    Wrong,
}

/// Game-level outcome of a single transition, carried into the board render
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameDealt {
        players: usize,
    },
    DiceThrown {
        user_id: UserId,
        result: i32,
    },
    Moved {
        user_id: UserId,
        place: Card,
    },
    SuspicionResolved {
        accuser: UserId,
        place: Card,
        person: Card,
        weapon: Card,
        refutations: Vec<Refutation>,
        next_turn: UserId,
    },
    AccusationResolved {
        accuser: UserId,
        outcome: AccusationOutcome,
        next_turn: Option<UserId>,
    },
}

impl GameEvent {
    pub fn actor(&self) -> Option<UserId> {
        match self {
            GameEvent::GameDealt { .. } => None,
            GameEvent::DiceThrown { user_id, .. } => Some(*user_id),
            GameEvent::Moved { user_id, .. } => Some(*user_id),
            GameEvent::SuspicionResolved { accuser, .. } => Some(*accuser),
            GameEvent::AccusationResolved { accuser, .. } => Some(*accuser),
        }
    }
}

/// What the renderer should show a user after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Paged content of a plain screen (greeting, rules, room list)
    Pages { state: UserState, page: i32 },
    /// Room lobby with its occupants
    Room,
    /// Lobby while other occupants are not ready yet
    Waiting { not_ready: Vec<UserId> },
    /// Shared game board, personalised per viewer
    Board { event: Option<GameEvent> },
    Farewell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderIntent {
    pub user_id: UserId,
    pub view: View,
}

impl RenderIntent {
    pub fn new(user_id: UserId, view: View) -> Self {
        Self { user_id, view }
    }
}
