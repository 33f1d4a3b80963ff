pub use super::cards::Entity as Cards;
pub use super::games::Entity as Games;
pub use super::linked_messages::Entity as LinkedMessages;
pub use super::messages::Entity as Messages;
pub use super::players::Entity as Players;
pub use super::rooms::Entity as Rooms;
pub use super::users::Entity as Users;
