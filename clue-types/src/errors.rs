use thiserror::Error;

use crate::{CardId, CardKind, RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot deal a game without players")]
    NoPlayers,
    #[error("{players} players but only {aliases} aliases available")]
    TooManyPlayers { players: usize, aliases: usize },
    #[error("room card pool has no {kind} cards")]
    EmptyPool { kind: CardKind },
    #[error("unknown {kind} card {id}")]
    UnknownCard { kind: CardKind, id: CardId },
    #[error("no accused {kind} chosen yet")]
    MissingAccusation { kind: CardKind },
    #[error("no active game in room {room_id}")]
    NoActiveGame { room_id: RoomId },
    #[error("user {user_id} is not in a room")]
    NotInRoom { user_id: UserId },
    #[error("game already finished")]
    GameFinished,
    #[error("corrupt game record: {reason}")]
    CorruptRecord { reason: String },
}
