#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::{
    board::Hex,
    models::{Company, Corporation, Player},
};

/// JSON document describing the game state at the start of the first stock round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawScenario {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
    #[serde(default)]
    pub market: Vec<Vec<String>>,
    #[serde(default)]
    pub corporations: Vec<Corporation>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub hexes: Vec<Hex>,
}

/// A player given either as a bare name or as a full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPlayer {
    Name(String),
    Full(Player),
}

impl From<RawPlayer> for Player {
    fn from(raw: RawPlayer) -> Self {
        match raw {
            RawPlayer::Name(name) => Player::named(name),
            RawPlayer::Full(player) => player,
        }
    }
}
