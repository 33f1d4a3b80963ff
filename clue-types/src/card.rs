use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CardId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Person,
    Place,
    Weapon,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::Weapon => "weapon",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "person" => Some(Self::Person),
            "place" => Some(Self::Place),
            "weapon" => Some(Self::Weapon),
            _ => None,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted reference to a card: `{"type": "person", "id": 3}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub id: CardId,
}

/// A card of a room's fixed pool. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub kind: CardKind,
    pub id: CardId,
    pub room_id: RoomId,
    pub name: String,
}

impl Card {
    pub fn new(kind: CardKind, id: CardId, room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            room_id,
            name: name.into(),
        }
    }

    pub fn to_ref(&self) -> CardRef {
        CardRef {
            kind: self.kind,
            id: self.id,
        }
    }

    /// Identity match: same category and same id
    pub fn is(&self, other: &Card) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
