#![allow(missing_docs)]

//! Scenario files describing the game at the start of the first stock round.

pub mod loader;
mod models;

pub use loader::ScenarioLoader;
pub use models::{RawPlayer, RawScenario};
