//! Generic stock round behaviour the first stock round builds on.

use crate::models::Player;

/// Default entity handling of a stock round.
pub trait StockRoundBase {
    /// Build the working entity list from a priority ordered list and pick the
    /// starting actor index.
    fn setup(&mut self, initial_order: Vec<Player>) -> (Vec<Player>, usize);

    /// Standard forward circular step.
    fn next_index(&self, index: usize, len: usize) -> usize {
        (index + 1) % len
    }
}

/// Plain stock round: entities as given, starting at the head of the list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStockRound;

impl StockRoundBase for StandardStockRound {
    fn setup(&mut self, initial_order: Vec<Player>) -> (Vec<Player>, usize) {
        (initial_order, 0)
    }
}
