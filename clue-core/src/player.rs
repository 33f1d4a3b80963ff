use clue_types::{Card, CardId, UserId};
use rand::Rng;

use crate::Distances;

/// Dice result before the player rolls in the current turn
pub const NOT_ROLLED: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub user_id: UserId,
    pub name: String,
    /// Fixed seat in the turn rotation
    pub number: usize,
    pub hand: Vec<Card>,
    /// Hand plus every card learned from refutations; append-only
    pub known_cards: Vec<Card>,
    /// Board identity, a Person card unique within the game
    pub alias: Card,
    pub place: Card,
    pub dice_result: i32,
    pub reachable_places: Vec<Card>,
    pub alive: bool,
}

impl Player {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        number: usize,
        hand: Vec<Card>,
        alias: Card,
        place: Card,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            number,
            known_cards: hand.clone(),
            hand,
            alias,
            place,
            dice_result: NOT_ROLLED,
            reachable_places: Vec::new(),
            alive: true,
        }
    }

    pub fn has_rolled(&self) -> bool {
        self.dice_result >= 0
    }

    /// Sum of two dice, rolled at most once per turn
    pub fn throw_dice<R: Rng + ?Sized>(&mut self, rng: &mut R, faces: i32) -> i32 {
        if !self.has_rolled() {
            let faces = faces.max(1);
            self.dice_result = rng.gen_range(1..=faces) + rng.gen_range(1..=faces);
        }
        self.dice_result
    }

    /// Re-arms the dice at the start of the player's turn
    pub fn reset_dice(&mut self) {
        self.dice_result = NOT_ROLLED;
    }

    /// Must run again whenever the place or the dice result changes
    pub fn populate_reachable_places(&mut self, places: &[Card], distances: &Distances) {
        self.reachable_places.clear();
        let Some(from) = places.iter().position(|p| p.is(&self.place)) else {
            return;
        };

        for (to, place) in places.iter().enumerate() {
            if let Some(cost) = distances.get(from, to) {
                if cost <= self.dice_result {
                    self.reachable_places.push(place.clone());
                }
            }
        }
    }

    pub fn can_reach(&self, place_id: CardId) -> bool {
        self.reachable_places.iter().any(|p| p.id == place_id)
    }

    pub fn holds(&self, card: &Card) -> bool {
        self.hand.iter().any(|c| c.is(card))
    }

    pub fn learn(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.known_cards.extend(cards);
    }
}
