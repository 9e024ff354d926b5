//! The first stock round: snake turn order and end of round cascade.

pub mod base;
pub mod closer;
pub mod turn_order;

use crate::{error::RoundResult, game::GameState, models::Player};

pub use base::{StandardStockRound, StockRoundBase};
pub use closer::{PriceChange, RoundCloser, RoundSummary};
pub use turn_order::{TurnOrder, TurnOrderSequencer};

/// Driver-facing entry point for the first stock round.
#[derive(Debug, Clone)]
pub struct FirstStockRound<B = StandardStockRound> {
    sequencer: TurnOrderSequencer<B>,
    closer: RoundCloser,
}

impl FirstStockRound {
    /// Round over the game's priority order using the standard base behaviour.
    pub fn new(state: &GameState) -> RoundResult<Self> {
        Self::with_base(state, StandardStockRound)
    }
}

impl<B: StockRoundBase> FirstStockRound<B> {
    /// Round over the game's priority order with a custom base.
    pub fn with_base(state: &GameState, base: B) -> RoundResult<Self> {
        Ok(Self {
            sequencer: TurnOrderSequencer::new(state.players().to_vec(), base)?,
            closer: RoundCloser,
        })
    }

    /// Human-readable round name.
    pub fn description(&self) -> &'static str {
        "First Stock Round"
    }

    /// Reverse the roster and let the base pick the first actor.
    pub fn setup(&mut self) -> RoundResult<()> {
        self.sequencer.setup()
    }

    /// Advance to the player taking the next turn.
    pub fn next_entity(&mut self) -> &Player {
        self.sequencer.advance()
    }

    /// The player whose turn it is.
    pub fn current_entity(&self) -> &Player {
        self.sequencer.current_entity()
    }

    /// Players in forward priority order.
    pub fn entities(&self) -> &[Player] {
        self.sequencer.entities()
    }

    /// Order the players are exposed in at round start.
    pub fn select_entities(&self) -> Vec<Player> {
        self.sequencer.initial_order()
    }

    /// Still inside the opening reverse lap.
    pub fn is_reverse(&self) -> bool {
        self.sequencer.is_reverse()
    }

    /// Resolve the end of the round. Consumes the round so it runs once.
    pub fn finish(self, state: &mut GameState) -> RoundResult<RoundSummary> {
        self.closer.finish(state)
    }
}
