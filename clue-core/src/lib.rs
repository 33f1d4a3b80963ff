pub mod action;
pub mod deck;
pub mod distances;
pub mod game_events;
pub mod game_state;
pub mod machine;
pub mod matchmaking;
pub mod player;
pub mod record;
pub mod session;

pub use action::*;
pub use deck::*;
pub use distances::*;
pub use game_events::*;
pub use game_state::*;
pub use machine::*;
pub use matchmaking::*;
pub use player::*;
pub use record::*;
pub use session::*;
