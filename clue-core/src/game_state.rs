use clue_types::{Card, CardId, CardKind, GameError, GameId, RoomId, UserId};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;
use uuid::Uuid;

use crate::{AccusationOutcome, CardPool, Distances, GameEvent, Player, Refutation, deal};

pub const DEFAULT_DICE_FACES: i32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    pub dice_faces: i32,
    /// Cards revealed to everyone at deal time, indexed by player count
    pub open_cards: Vec<usize>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            dice_faces: DEFAULT_DICE_FACES,
            open_cards: vec![0; 6],
        }
    }
}

impl GameRules {
    pub fn open_count(&self, players: usize) -> usize {
        self.open_cards.get(players).copied().unwrap_or(0)
    }
}

/// The hidden triple. Never part of a hand or of the open cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    pub person: Card,
    pub weapon: Card,
    pub place: Card,
}

impl Secret {
    pub fn contains(&self, card: &Card) -> bool {
        self.person.is(card) || self.weapon.is(card) || self.place.is(card)
    }

    pub fn matches(&self, place: &Card, person: &Card, weapon: &Card) -> bool {
        self.place.is(place) && self.person.is(person) && self.weapon.is(weapon)
    }
}

/// A room occupant taking part in a new deal
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    pub user_id: UserId,
    pub name: String,
}

impl Seat {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    pub room_id: RoomId,
    pub pool: CardPool,
    pub secret: Secret,
    pub distances: Distances,
    /// Ordered by turn number
    pub players: Vec<Player>,
    pub turn_number: usize,
    pub open_cards: Vec<Card>,
    pub started: bool,
    pub won: bool,
    pub winner: Option<UserId>,
    pub accused_place: Option<Card>,
    pub accused_person: Option<Card>,
    pub accused_weapon: Option<Card>,
    /// Refutations collected by the latest suspicion
    pub refutations: Vec<Refutation>,
    /// Accuser of the latest suspicion
    pub suspected_by: Option<UserId>,
}

fn pick<R: Rng + ?Sized>(pool: &CardPool, kind: CardKind, rng: &mut R) -> Result<Card, GameError> {
    pool.cards_of(kind)
        .choose(rng)
        .cloned()
        .ok_or(GameError::EmptyPool { kind })
}

impl Game {
    /// Fresh deal for everyone seated in the room
    pub fn deal<R: Rng + ?Sized>(
        room_id: RoomId,
        pool: CardPool,
        seats: Vec<Seat>,
        rules: &GameRules,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if seats.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if seats.len() > pool.persons.len() {
            return Err(GameError::TooManyPlayers {
                players: seats.len(),
                aliases: pool.persons.len(),
            });
        }

        let secret = Secret {
            person: pick(&pool, CardKind::Person, rng)?,
            weapon: pick(&pool, CardKind::Weapon, rng)?,
            place: pick(&pool, CardKind::Place, rng)?,
        };
        let distances = Distances::generate(pool.places.len(), rng);

        let mut cards = pool.all_cards();
        cards.shuffle(rng);
        cards.retain(|card| !secret.contains(card));

        let mut seats = seats;
        seats.shuffle(rng);
        let n = seats.len();
        let dealt = deal(&cards, n, rules.open_count(n))?;

        let mut aliases = pool.persons.clone();
        let mut players = Vec::with_capacity(n);
        for (number, (seat, hand)) in seats.into_iter().zip(dealt.hands).enumerate() {
            let alias = aliases.remove(rng.gen_range(0..aliases.len()));
            let place = pick(&pool, CardKind::Place, rng)?;
            players.push(Player::new(seat.user_id, seat.name, number, hand, alias, place));
        }

        let turn_number = rng.gen_range(0..n);
        let id = Uuid::new_v4();
        info!(
            "Dealt game {} in room {} for {} players, {} open cards, first turn {}",
            id,
            room_id,
            n,
            dealt.open_cards.len(),
            turn_number
        );

        Ok(Self {
            id,
            room_id,
            pool,
            secret,
            distances,
            players,
            turn_number,
            open_cards: dealt.open_cards,
            started: true,
            won: false,
            winner: None,
            accused_place: None,
            accused_person: None,
            accused_weapon: None,
            refutations: Vec::new(),
            suspected_by: None,
        })
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_for(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn player_by_number(&self, number: usize) -> Option<&Player> {
        self.players.iter().find(|p| p.number == number)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.player_by_number(self.turn_number)
    }

    pub fn is_turn_of(&self, user_id: UserId) -> bool {
        self.current_player().is_some_and(|p| p.user_id == user_id)
    }

    pub fn alive_players(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Who would hold the turn after the current one
    pub fn next_player(&self) -> Option<&Player> {
        self.next_live_number(self.turn_number)
            .and_then(|number| self.player_by_number(number))
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|user_id| self.player_for(user_id))
    }

    pub fn is_over(&self) -> bool {
        self.won || self.alive_players() == 0
    }

    fn current_index(&self) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.number == self.turn_number)
            .ok_or_else(|| GameError::CorruptRecord {
                reason: format!("turn pointer {} has no player", self.turn_number),
            })
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameFinished);
        }
        Ok(())
    }

    fn next_live_number(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|number| self.player_by_number(*number).is_some_and(|p| p.alive))
    }

    /// Round-robin by turn number. Eliminated players keep their seat but
    /// are stepped over, so the pointer always lands on a live player.
    pub fn advance_turn(&mut self) -> Option<UserId> {
        let n = self.players.len();
        if n == 0 {
            return None;
        }
        self.turn_number = self
            .next_live_number(self.turn_number)
            .unwrap_or((self.turn_number + 1) % n);

        let index = self.current_index().ok()?;
        let player = &mut self.players[index];
        player.reset_dice();
        player.populate_reachable_places(&self.pool.places, &self.distances);
        info!("Game {} turn passes to player {} ({})", self.id, player.number, player.name);
        Some(player.user_id)
    }

    /// The turn holder rolls, once per turn, and learns where they can go
    pub fn throw_dice<R: Rng + ?Sized>(
        &mut self,
        rules: &GameRules,
        rng: &mut R,
    ) -> Result<GameEvent, GameError> {
        self.ensure_running()?;
        let index = self.current_index()?;
        let player = &mut self.players[index];
        let result = player.throw_dice(rng, rules.dice_faces);
        player.populate_reachable_places(&self.pool.places, &self.distances);

        Ok(GameEvent::DiceThrown {
            user_id: player.user_id,
            result,
        })
    }

    /// Reachability is not re-checked here; the keyboard only offers
    /// reachable places.
    pub fn move_current_player(&mut self, place_id: CardId) -> Result<GameEvent, GameError> {
        self.ensure_running()?;
        let place = self.pool.card(CardKind::Place, place_id)?.clone();
        let index = self.current_index()?;
        let player = &mut self.players[index];
        player.place = place.clone();
        player.populate_reachable_places(&self.pool.places, &self.distances);
        self.accused_place = Some(place.clone());

        Ok(GameEvent::Moved {
            user_id: player.user_id,
            place,
        })
    }

    pub fn choose_person(&mut self, person_id: CardId) -> Result<(), GameError> {
        self.ensure_running()?;
        self.accused_person = Some(self.pool.card(CardKind::Person, person_id)?.clone());
        Ok(())
    }

    pub fn choose_weapon(&mut self, weapon_id: CardId) -> Result<(), GameError> {
        self.ensure_running()?;
        self.accused_weapon = Some(self.pool.card(CardKind::Weapon, weapon_id)?.clone());
        Ok(())
    }

    fn accused_triple(&self, accuser: &Player) -> Result<(Card, Card, Card), GameError> {
        let person = self
            .accused_person
            .clone()
            .ok_or(GameError::MissingAccusation {
                kind: CardKind::Person,
            })?;
        let weapon = self
            .accused_weapon
            .clone()
            .ok_or(GameError::MissingAccusation {
                kind: CardKind::Weapon,
            })?;
        Ok((accuser.place.clone(), person, weapon))
    }

    /// Every (player, card) pair among the other players' hands that
    /// matches the accuser's place, person or weapon. Players in seat
    /// order; place, person, weapon order within a hand.
    pub fn check_suspicion(&self, accuser_number: usize) -> Result<Vec<Refutation>, GameError> {
        let accuser = self
            .player_by_number(accuser_number)
            .ok_or_else(|| GameError::CorruptRecord {
                reason: format!("no player with number {}", accuser_number),
            })?;
        let (place, person, weapon) = self.accused_triple(accuser)?;

        let mut refutations = Vec::new();
        for other in self.players.iter().filter(|p| p.number != accuser.number) {
            for target in [&place, &person, &weapon] {
                refutations.extend(other.hand.iter().filter(|card| card.is(target)).map(|card| {
                    Refutation {
                        user_id: other.user_id,
                        player_number: other.number,
                        card: card.clone(),
                    }
                }));
            }
        }
        Ok(refutations)
    }

    /// Runs the turn holder's suspicion, teaches them every revealed card
    /// and passes the turn
    pub fn resolve_suspicion(&mut self) -> Result<GameEvent, GameError> {
        self.ensure_running()?;
        let index = self.current_index()?;
        let accuser_number = self.players[index].number;
        let refutations = self.check_suspicion(accuser_number)?;
        let (place, person, weapon) = self.accused_triple(&self.players[index])?;

        let accuser = &mut self.players[index];
        accuser.learn(refutations.iter().map(|r| r.card.clone()));
        let accuser_id = accuser.user_id;
        info!(
            "Game {}: {} suspects {} with {} in {}, {} refutations",
            self.id,
            accuser.name,
            person,
            weapon,
            place,
            refutations.len()
        );
        self.refutations = refutations.clone();
        self.suspected_by = Some(accuser_id);

        let next_turn = self.advance_turn().unwrap_or(accuser_id);
        Ok(GameEvent::SuspicionResolved {
            accuser: accuser_id,
            place,
            person,
            weapon,
            refutations,
            next_turn,
        })
    }

    /// Binding accusation: a correct triple wins the game, a wrong one
    /// eliminates the accuser
    pub fn resolve_accusation(&mut self) -> Result<GameEvent, GameError> {
        self.ensure_running()?;
        let index = self.current_index()?;
        let (place, person, weapon) = self.accused_triple(&self.players[index])?;
        let accuser = self.players[index].user_id;

        if self.secret.matches(&place, &person, &weapon) {
            self.won = true;
            self.winner = Some(accuser);
            info!("Game {} won by user {}", self.id, accuser);
            return Ok(GameEvent::AccusationResolved {
                accuser,
                outcome: AccusationOutcome::Correct,
                next_turn: None,
            });
        }

        self.players[index].alive = false;
        info!("Game {}: user {} accused wrongly and is out", self.id, accuser);
        let next_turn = if self.alive_players() > 0 {
            self.advance_turn()
        } else {
            None
        };
        Ok(GameEvent::AccusationResolved {
            accuser,
            outcome: AccusationOutcome::Wrong,
            next_turn,
        })
    }
}
