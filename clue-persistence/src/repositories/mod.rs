pub mod card_repository;
pub mod content_repository;
pub mod game_repository;
pub mod room_repository;
pub mod user_repository;

pub use card_repository::CardRepository;
pub use content_repository::{ContentPage, ContentRepository};
pub use game_repository::GameRepository;
pub use room_repository::RoomRepository;
pub use user_repository::UserRepository;
