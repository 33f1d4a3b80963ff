pub mod card;
pub mod errors;
pub mod messages;
pub mod user;

// Re-export all types
pub use card::*;
pub use errors::*;
pub use messages::*;
pub use user::*;

pub type UserId = i32;
pub type RoomId = i32;
pub type CardId = i32;
pub type ChatId = i64;
pub type MessageId = i64;
pub type GameId = uuid::Uuid;
