use clue_types::{Card, CardId, CardKind, CardRef, GameError};

/// A room's fixed card pool, split by category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPool {
    pub persons: Vec<Card>,
    pub weapons: Vec<Card>,
    pub places: Vec<Card>,
}

impl CardPool {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut pool = Self::default();
        for card in cards {
            match card.kind {
                CardKind::Person => pool.persons.push(card),
                CardKind::Weapon => pool.weapons.push(card),
                CardKind::Place => pool.places.push(card),
            }
        }
        pool
    }

    pub fn cards_of(&self, kind: CardKind) -> &[Card] {
        match kind {
            CardKind::Person => &self.persons,
            CardKind::Weapon => &self.weapons,
            CardKind::Place => &self.places,
        }
    }

    /// Persons, then weapons, then places
    pub fn all_cards(&self) -> Vec<Card> {
        self.persons
            .iter()
            .chain(self.weapons.iter())
            .chain(self.places.iter())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.persons.len() + self.weapons.len() + self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, card: CardRef) -> Option<&Card> {
        self.cards_of(card.kind).iter().find(|c| c.id == card.id)
    }

    pub fn card(&self, kind: CardKind, id: CardId) -> Result<&Card, GameError> {
        self.find(CardRef { kind, id })
            .ok_or(GameError::UnknownCard { kind, id })
    }

    pub fn resolve(&self, refs: &[CardRef]) -> Result<Vec<Card>, GameError> {
        refs.iter()
            .map(|r| self.card(r.kind, r.id).cloned())
            .collect()
    }

    /// Index of a place within `places`, which is also its row in the distance table
    pub fn place_index(&self, id: CardId) -> Option<usize> {
        self.places.iter().position(|p| p.id == id)
    }
}

/// Result of dealing a shuffled deck
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub open_cards: Vec<Card>,
    pub hands: Vec<Vec<Card>>,
}

/// Takes `open_count` public cards from the front, then cuts the rest into
/// `players` equal contiguous hands. The division remainder is dropped.
pub fn deal(cards: &[Card], players: usize, open_count: usize) -> Result<Deal, GameError> {
    if players == 0 {
        return Err(GameError::NoPlayers);
    }

    let open_count = open_count.min(cards.len());
    let (open, rest) = cards.split_at(open_count);
    let hand_size = rest.len() / players;

    let hands = (0..players)
        .map(|i| rest[i * hand_size..(i + 1) * hand_size].to_vec())
        .collect();

    Ok(Deal {
        open_cards: open.to_vec(),
        hands,
    })
}
