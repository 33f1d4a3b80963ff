pub mod prelude;

pub mod cards;
pub mod games;
pub mod linked_messages;
pub mod messages;
pub mod players;
pub mod rooms;
pub mod users;
