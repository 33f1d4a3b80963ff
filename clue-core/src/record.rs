use clue_types::{Card, CardId, CardKind, CardRef, GameError, GameId, RoomId, UserId};
use serde::{Deserialize, Serialize};

use crate::{CardPool, Distances, Game, Player, Refutation, Secret};

/// Flat game row as stored: card lists and the secret as JSON, distances
/// in their text form
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: GameId,
    pub room_id: RoomId,
    pub secret: String,
    pub distances: String,
    pub open_cards: String,
    pub started: bool,
    pub won: bool,
    pub turn_number: i32,
    pub accuse_place: Option<CardId>,
    pub accuse_person: Option<CardId>,
    pub accuse_weapon: Option<CardId>,
    pub winner: Option<UserId>,
    /// Latest suspicion, see [`suspicion_to_json`]
    pub suspicion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub user_id: UserId,
    pub name: String,
    pub number: i32,
    pub cards: String,
    pub known_cards: String,
    pub alias: CardId,
    pub place: CardId,
    pub dice_result: i32,
    pub alive: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SecretIds {
    person: CardId,
    weapon: CardId,
    place: CardId,
}

#[derive(Debug, Serialize, Deserialize)]
struct SuspicionRow {
    accuser: usize,
    refutations: Vec<RefutationRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RefutationRow {
    number: usize,
    card: CardRef,
}

fn corrupt(reason: impl Into<String>) -> GameError {
    GameError::CorruptRecord {
        reason: reason.into(),
    }
}

/// `[{"type": "person", "id": 3}, ...]`
pub fn cards_to_json(cards: &[Card]) -> Result<String, GameError> {
    let refs: Vec<CardRef> = cards.iter().map(Card::to_ref).collect();
    serde_json::to_string(&refs).map_err(|e| corrupt(e.to_string()))
}

pub fn json_to_refs(src: &str) -> Result<Vec<CardRef>, GameError> {
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(src).map_err(|e| corrupt(format!("bad card list: {}", e)))
}

pub fn secret_to_json(secret: &Secret) -> Result<String, GameError> {
    let ids = SecretIds {
        person: secret.person.id,
        weapon: secret.weapon.id,
        place: secret.place.id,
    };
    serde_json::to_string(&ids).map_err(|e| corrupt(e.to_string()))
}

fn secret_from_json(src: &str, pool: &CardPool) -> Result<Secret, GameError> {
    let ids: SecretIds =
        serde_json::from_str(src).map_err(|e| corrupt(format!("bad secret: {}", e)))?;
    Ok(Secret {
        person: pool.card(CardKind::Person, ids.person)?.clone(),
        weapon: pool.card(CardKind::Weapon, ids.weapon)?.clone(),
        place: pool.card(CardKind::Place, ids.place)?.clone(),
    })
}

/// `{"accuser": 0, "refutations": [{"number": 1, "card": {"type": "weapon", "id": 2}}]}`,
/// players by turn number
fn suspicion_to_json(game: &Game) -> Result<Option<String>, GameError> {
    let Some(accuser) = game.suspected_by.and_then(|id| game.player_for(id)) else {
        return Ok(None);
    };
    let row = SuspicionRow {
        accuser: accuser.number,
        refutations: game
            .refutations
            .iter()
            .map(|r| RefutationRow {
                number: r.player_number,
                card: r.card.to_ref(),
            })
            .collect(),
    };
    serde_json::to_string(&row)
        .map(Some)
        .map_err(|e| corrupt(e.to_string()))
}

fn suspicion_from_json(
    src: &str,
    players: &[Player],
    pool: &CardPool,
) -> Result<(UserId, Vec<Refutation>), GameError> {
    let row: SuspicionRow =
        serde_json::from_str(src).map_err(|e| corrupt(format!("bad suspicion: {}", e)))?;
    let user_of = |number: usize| {
        players
            .iter()
            .find(|p| p.number == number)
            .map(|p| p.user_id)
            .ok_or_else(|| corrupt(format!("suspicion names missing player {}", number)))
    };

    let accuser = user_of(row.accuser)?;
    let refutations = row
        .refutations
        .into_iter()
        .map(|r| {
            Ok(Refutation {
                user_id: user_of(r.number)?,
                player_number: r.number,
                card: pool.card(r.card.kind, r.card.id)?.clone(),
            })
        })
        .collect::<Result<Vec<_>, GameError>>()?;
    Ok((accuser, refutations))
}

fn optional_card(pool: &CardPool, kind: CardKind, id: Option<CardId>) -> Result<Option<Card>, GameError> {
    id.map(|id| pool.card(kind, id).cloned()).transpose()
}

impl Game {
    pub fn to_records(&self) -> Result<(GameRecord, Vec<PlayerRecord>), GameError> {
        let record = GameRecord {
            id: self.id,
            room_id: self.room_id,
            secret: secret_to_json(&self.secret)?,
            distances: self.distances.to_string(),
            open_cards: cards_to_json(&self.open_cards)?,
            started: self.started,
            won: self.won,
            turn_number: self.turn_number as i32,
            accuse_place: self.accused_place.as_ref().map(|c| c.id),
            accuse_person: self.accused_person.as_ref().map(|c| c.id),
            accuse_weapon: self.accused_weapon.as_ref().map(|c| c.id),
            winner: self.winner,
            suspicion: suspicion_to_json(self)?,
        };

        let players = self
            .players
            .iter()
            .map(|p| {
                Ok(PlayerRecord {
                    user_id: p.user_id,
                    name: p.name.clone(),
                    number: p.number as i32,
                    cards: cards_to_json(&p.hand)?,
                    known_cards: cards_to_json(&p.known_cards)?,
                    alias: p.alias.id,
                    place: p.place.id,
                    dice_result: p.dice_result,
                    alive: p.alive,
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        Ok((record, players))
    }

    /// Rebuilds a game from its rows; reachable places are recomputed
    /// from the stored dice result
    pub fn from_records(
        record: GameRecord,
        players: Vec<PlayerRecord>,
        pool: CardPool,
    ) -> Result<Self, GameError> {
        let distances: Distances = record.distances.parse()?;
        if distances.len() != pool.places.len() {
            return Err(corrupt(format!(
                "distance table is {}x{} for {} places",
                distances.len(),
                distances.len(),
                pool.places.len()
            )));
        }

        let mut restored = Vec::with_capacity(players.len());
        for row in players {
            if row.number < 0 {
                return Err(corrupt(format!("negative player number {}", row.number)));
            }
            let mut player = Player::new(
                row.user_id,
                row.name,
                row.number as usize,
                pool.resolve(&json_to_refs(&row.cards)?)?,
                pool.card(CardKind::Person, row.alias)?.clone(),
                pool.card(CardKind::Place, row.place)?.clone(),
            );
            player.known_cards = pool.resolve(&json_to_refs(&row.known_cards)?)?;
            player.dice_result = row.dice_result;
            player.alive = row.alive;
            player.populate_reachable_places(&pool.places, &distances);
            restored.push(player);
        }
        restored.sort_by_key(|p| p.number);

        let turn_number = usize::try_from(record.turn_number)
            .map_err(|_| corrupt(format!("negative turn number {}", record.turn_number)))?;
        if !restored.is_empty() && !restored.iter().any(|p| p.number == turn_number) {
            return Err(corrupt(format!("turn pointer {} has no player", turn_number)));
        }

        let (suspected_by, refutations) = match record.suspicion.as_deref() {
            Some(src) if !src.trim().is_empty() => {
                let (accuser, refutations) = suspicion_from_json(src, &restored, &pool)?;
                (Some(accuser), refutations)
            }
            _ => (None, Vec::new()),
        };

        Ok(Self {
            id: record.id,
            room_id: record.room_id,
            secret: secret_from_json(&record.secret, &pool)?,
            distances,
            open_cards: pool.resolve(&json_to_refs(&record.open_cards)?)?,
            started: record.started,
            won: record.won,
            winner: record.winner,
            accused_place: optional_card(&pool, CardKind::Place, record.accuse_place)?,
            accused_person: optional_card(&pool, CardKind::Person, record.accuse_person)?,
            accused_weapon: optional_card(&pool, CardKind::Weapon, record.accuse_weapon)?,
            players: restored,
            turn_number,
            pool,
            refutations,
            suspected_by,
        })
    }
}
