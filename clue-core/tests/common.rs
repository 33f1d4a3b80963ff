#![allow(dead_code)]

use clue_core::{CardPool, Game, GameRules, Seat};
use clue_types::{Card, CardKind, User, UserId, UserState};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const PERSONS: [&str; 6] = ["Scarlett", "Mustard", "White", "Green", "Peacock", "Plum"];
pub const WEAPONS: [&str; 6] = ["Candlestick", "Dagger", "Lead Pipe", "Revolver", "Rope", "Wrench"];
pub const PLACES: [&str; 9] = [
    "Kitchen",
    "Ballroom",
    "Conservatory",
    "Dining Room",
    "Billiard Room",
    "Library",
    "Lounge",
    "Hall",
    "Study",
];

/// Classic room: 6 persons, 6 weapons, 9 places, ids starting at 1
pub fn classic_pool() -> CardPool {
    let mut cards = Vec::new();
    for (i, name) in PERSONS.iter().enumerate() {
        cards.push(Card::new(CardKind::Person, i as i32 + 1, 1, *name));
    }
    for (i, name) in WEAPONS.iter().enumerate() {
        cards.push(Card::new(CardKind::Weapon, i as i32 + 1, 1, *name));
    }
    for (i, name) in PLACES.iter().enumerate() {
        cards.push(Card::new(CardKind::Place, i as i32 + 1, 1, *name));
    }
    CardPool::new(cards)
}

pub fn seats(n: i32) -> Vec<Seat> {
    (1..=n).map(|id| Seat::new(id, format!("Player{}", id))).collect()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Fresh classic game with default rules
pub fn deal_game(players: i32, seed: u64) -> Game {
    let mut rng = rng(seed);
    Game::deal(1, classic_pool(), seats(players), &GameRules::default(), &mut rng)
        .expect("classic deal should succeed")
}

pub fn card(pool: &CardPool, kind: CardKind, id: i32) -> Card {
    pool.card(kind, id).expect("card in classic pool").clone()
}

/// Overwrites every hand; known cards follow the new hands
pub fn rig_hands(game: &mut Game, hands: Vec<Vec<Card>>) {
    for (player, hand) in game.players.iter_mut().zip(hands) {
        player.known_cards = hand.clone();
        player.hand = hand;
    }
}

pub fn test_user(id: UserId, state: UserState) -> User {
    User {
        id,
        name: format!("Player{}", id),
        chat_id: 1000 + id as i64,
        state,
        substate: 0,
        room_id: Some(1),
        last_message_id: None,
    }
}
