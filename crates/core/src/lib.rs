#![warn(clippy::all, missing_docs)]

//! Core logic for the first stock round of 1824-style 18xx games.
//!
//! This crate hosts the domain models, the game state context,
//! the snake turn order and the end of round cascade, plus the
//! configuration and scenario loading used by the CLI.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod market;
pub mod models;
pub mod round;
pub mod scenario;

pub use crate::config::AppConfig;
pub use error::{ConfigurationError, InvariantViolation, RoundError, RoundResult};
pub use game::{GameLog, GameState};
pub use models::{Company, Corporation, Player};
pub use round::{FirstStockRound, RoundCloser, RoundSummary, TurnOrderSequencer};
pub use scenario::ScenarioLoader;
