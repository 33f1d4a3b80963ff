use anyhow::Result;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{prelude::*, rooms};
use clue_types::{GameId, Room, RoomId};

#[derive(Clone)]
pub struct RoomRepository {
    db: DatabaseConnection,
}

impl RoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_room(model: rooms::Model) -> Room {
        Room {
            id: model.id,
            name: model.name,
            game_id: model.game_id,
        }
    }

    pub async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>> {
        let room_model = Rooms::find_by_id(id).one(&self.db).await?;
        Ok(room_model.map(Self::model_to_room))
    }

    pub async fn all(&self) -> Result<Vec<Room>> {
        let rooms = Rooms::find()
            .order_by_asc(rooms::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rooms.into_iter().map(Self::model_to_room).collect())
    }

    pub async fn create_room(&self, name: &str) -> Result<Room> {
        let room_model = rooms::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
            game_id: ActiveValue::Set(None),
        };
        let saved = Rooms::insert(room_model).exec(&self.db).await?;

        self.find_by_id(saved.last_insert_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created room"))
    }

    /// Points the room at its latest game snapshot
    pub async fn bind_game(&self, room_id: RoomId, game_id: Option<GameId>) -> Result<()> {
        let room = rooms::ActiveModel {
            id: ActiveValue::Unchanged(room_id),
            name: ActiveValue::NotSet,
            game_id: ActiveValue::Set(game_id),
        };
        Rooms::update(room).exec(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait, CLASSIC_ROOM};

    async fn setup_test_db() -> RoomRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        RoomRepository::new(db)
    }

    #[tokio::test]
    async fn test_seeded_room() {
        let repo = setup_test_db().await;

        let room = repo.find_by_id(CLASSIC_ROOM).await.unwrap().unwrap();
        assert_eq!(room.name, "Classic Mansion");
        assert_eq!(room.game_id, None);
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bind_game() {
        let repo = setup_test_db().await;
        let room = repo.create_room("Annex").await.unwrap();

        let game_id = uuid::Uuid::new_v4();
        repo.bind_game(room.id, Some(game_id)).await.unwrap();
        let found = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(found.game_id, Some(game_id));
        assert_eq!(found.name, "Annex");
    }
}
