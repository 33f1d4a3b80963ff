use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{games, players, prelude::*, rooms};
use clue_core::{CardPool, Game, GameRecord, PlayerRecord};
use clue_types::{GameId, RoomId};

#[derive(Clone)]
pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: games::Model) -> GameRecord {
        GameRecord {
            id: model.id,
            room_id: model.room_id,
            secret: model.secret,
            distances: model.distances,
            open_cards: model.open_cards,
            started: model.started,
            won: model.won,
            turn_number: model.turn_number,
            accuse_place: model.accuse_place,
            accuse_person: model.accuse_person,
            accuse_weapon: model.accuse_weapon,
            winner: model.winner,
            suspicion: model.suspicion,
        }
    }

    fn model_to_player_record(model: players::Model) -> PlayerRecord {
        PlayerRecord {
            user_id: model.user_id,
            name: model.name,
            number: model.number,
            cards: model.cards,
            known_cards: model.known_cards,
            alias: model.alias,
            place: model.place,
            dice_result: model.dice_result,
            alive: model.alive,
        }
    }

    /// Rebuilds a snapshot against the room's card pool
    pub async fn load(&self, game_id: GameId, pool: CardPool) -> Result<Option<Game>> {
        let found = Games::find_by_id(game_id)
            .find_with_related(Players)
            .all(&self.db)
            .await?;

        let Some((game_model, player_models)) = found.into_iter().next() else {
            return Ok(None);
        };

        let players = player_models
            .into_iter()
            .map(Self::model_to_player_record)
            .collect();
        let game = Game::from_records(Self::model_to_record(game_model), players, pool)?;
        Ok(Some(game))
    }

    /// Writes the game as a new snapshot under a fresh id and rebinds the
    /// room to it. Older snapshots stay in place.
    pub async fn save_snapshot(&self, game: &mut Game) -> Result<GameId> {
        game.id = Uuid::new_v4();
        let (record, player_records) = game.to_records()?;
        let now = chrono::Utc::now().into();

        let txn = self.db.begin().await?;

        let game_model = games::ActiveModel {
            id: ActiveValue::Set(record.id),
            room_id: ActiveValue::Set(record.room_id),
            secret: ActiveValue::Set(record.secret),
            distances: ActiveValue::Set(record.distances),
            open_cards: ActiveValue::Set(record.open_cards),
            started: ActiveValue::Set(record.started),
            won: ActiveValue::Set(record.won),
            turn_number: ActiveValue::Set(record.turn_number),
            accuse_place: ActiveValue::Set(record.accuse_place),
            accuse_person: ActiveValue::Set(record.accuse_person),
            accuse_weapon: ActiveValue::Set(record.accuse_weapon),
            winner: ActiveValue::Set(record.winner),
            suspicion: ActiveValue::Set(record.suspicion),
            created_at: ActiveValue::Set(now),
        };
        Games::insert(game_model).exec(&txn).await?;

        let player_models: Vec<players::ActiveModel> = player_records
            .into_iter()
            .map(|p| players::ActiveModel {
                id: ActiveValue::NotSet,
                game_id: ActiveValue::Set(record.id),
                user_id: ActiveValue::Set(p.user_id),
                name: ActiveValue::Set(p.name),
                number: ActiveValue::Set(p.number),
                cards: ActiveValue::Set(p.cards),
                known_cards: ActiveValue::Set(p.known_cards),
                alias: ActiveValue::Set(p.alias),
                place: ActiveValue::Set(p.place),
                dice_result: ActiveValue::Set(p.dice_result),
                alive: ActiveValue::Set(p.alive),
            })
            .collect();
        if !player_models.is_empty() {
            Players::insert_many(player_models).exec(&txn).await?;
        }

        let room = rooms::ActiveModel {
            id: ActiveValue::Unchanged(record.room_id),
            name: ActiveValue::NotSet,
            game_id: ActiveValue::Set(Some(record.id)),
        };
        Rooms::update(room).exec(&txn).await?;

        txn.commit().await?;

        info!(
            "Persisted game snapshot {} for room {} (turn {}, won: {})",
            record.id, record.room_id, record.turn_number, record.won
        );
        Ok(record.id)
    }

    pub async fn count_snapshots(&self, room_id: RoomId) -> Result<u64> {
        let count = Games::find()
            .filter(games::Column::RoomId.eq(room_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
