pub mod connection;
pub mod entities;
pub mod repositories;

use sea_orm::DatabaseConnection;

pub use repositories::*;

/// Every repository over one shared connection
#[derive(Clone)]
pub struct Store {
    pub users: UserRepository,
    pub rooms: RoomRepository,
    pub cards: CardRepository,
    pub games: GameRepository,
    pub content: ContentRepository,
}

impl Store {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(connection.clone()),
            rooms: RoomRepository::new(connection.clone()),
            cards: CardRepository::new(connection.clone()),
            games: GameRepository::new(connection.clone()),
            content: ContentRepository::new(connection),
        }
    }
}
