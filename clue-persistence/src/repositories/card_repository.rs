use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

use crate::entities::{cards, prelude::*};
use clue_core::CardPool;
use clue_types::{Card, CardKind, RoomId};

#[derive(Clone)]
pub struct CardRepository {
    db: DatabaseConnection,
}

impl CardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_card(model: cards::Model) -> Option<Card> {
        let Some(kind) = CardKind::parse(&model.kind) else {
            warn!("Skipping card row {} with unknown kind '{}'", model.id, model.kind);
            return None;
        };
        Some(Card::new(kind, model.card_id, model.room_id, model.name))
    }

    /// The room's fixed pool, each category ordered by card id
    pub async fn pool_for_room(&self, room_id: RoomId) -> Result<CardPool> {
        let rows = Cards::find()
            .filter(cards::Column::RoomId.eq(room_id))
            .order_by_asc(cards::Column::CardId)
            .all(&self.db)
            .await?;

        Ok(CardPool::new(
            rows.into_iter().filter_map(Self::model_to_card).collect(),
        ))
    }
}
