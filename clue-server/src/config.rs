use std::env;
use std::path::PathBuf;

use clue_core::{DEFAULT_DICE_FACES, GameRules};
use clue_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the outbound chat gateway
    pub transport_url: String,
    /// Directory media files are served from
    pub static_root: PathBuf,
    pub dice_faces: i32,
    /// Open cards per player count, `OPEN_CARDS=0,0,0,1,2,0`
    pub open_cards: Vec<usize>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            transport_url: env::var("TRANSPORT_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8081".to_string()),
            static_root: env::var("STATIC_ROOT")
                .unwrap_or_else(|_| "./static".to_string())
                .into(),
            dice_faces: env::var("DICE_FACES")
                .unwrap_or_else(|_| DEFAULT_DICE_FACES.to_string())
                .parse()
                .expect("Invalid DICE_FACES"),
            open_cards: parse_open_cards(
                &env::var("OPEN_CARDS").unwrap_or_else(|_| "0,0,0,0,0,0".to_string()),
            )
            .expect("Invalid OPEN_CARDS"),
        }
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            dice_faces: self.dice_faces,
            open_cards: self.open_cards.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_open_cards(value: &str) -> Result<Vec<usize>, std::num::ParseIntError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}
