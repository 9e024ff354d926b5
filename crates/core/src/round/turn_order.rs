//! Snake turn order: one reverse lap, then forward priority order.

use tracing::debug;

use crate::{
    error::{ConfigurationError, RoundResult},
    models::Player,
};

use super::base::StockRoundBase;

/// Traversal state. There is no transition from `Forward` back to `Reverse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrder {
    /// Walking the roster backwards; `steps` counts reverse moves made so far.
    Reverse {
        /// Current actor index.
        index: usize,
        /// Reverse moves made so far.
        steps: usize,
    },
    /// Standard stock round order.
    Forward {
        /// Current actor index.
        index: usize,
    },
}

impl TurnOrder {
    /// Current actor index into the entity list.
    pub fn index(&self) -> usize {
        match *self {
            TurnOrder::Reverse { index, .. } | TurnOrder::Forward { index } => index,
        }
    }

    /// Whether the opening reverse lap is still running.
    pub fn is_reverse(&self) -> bool {
        matches!(self, TurnOrder::Reverse { .. })
    }
}

/// Computes and advances the acting player of the first stock round.
#[derive(Debug, Clone)]
pub struct TurnOrderSequencer<B> {
    roster: Vec<Player>,
    entities: Vec<Player>,
    order: TurnOrder,
    base: B,
}

impl<B: StockRoundBase> TurnOrderSequencer<B> {
    /// `roster` is the game's priority order and must not be empty.
    pub fn new(roster: Vec<Player>, base: B) -> RoundResult<Self> {
        if roster.is_empty() {
            return Err(ConfigurationError::EmptyRoster.into());
        }
        Ok(Self {
            entities: roster.clone(),
            roster,
            order: TurnOrder::Reverse { index: 0, steps: 0 },
            base,
        })
    }

    /// Roster in reverse priority order, as handed to the base setup.
    pub fn initial_order(&self) -> Vec<Player> {
        self.roster.iter().rev().cloned().collect()
    }

    /// Set up the round: the base builds its state from the reversed order,
    /// then the entity list is flipped back to forward order while the actor
    /// index the base chose is kept.
    pub fn setup(&mut self) -> RoundResult<()> {
        let (mut entities, index) = self.base.setup(self.initial_order());
        if entities.is_empty() {
            return Err(ConfigurationError::EmptyRoster.into());
        }
        entities.reverse();
        let index = index % entities.len();
        self.entities = entities;
        self.order = TurnOrder::Reverse { index, steps: 0 };
        debug!(index, "first stock round turn order set up");
        Ok(())
    }

    /// Move to the next actor and return it.
    pub fn advance(&mut self) -> &Player {
        let len = self.entities.len();
        self.order = match self.order {
            TurnOrder::Reverse { index, steps } if steps >= len => {
                self.entities = self.roster.clone();
                let len = self.entities.len();
                debug!(index, "reverse lap complete, switching to priority order");
                TurnOrder::Forward {
                    index: self.base.next_index(index % len, len),
                }
            }
            TurnOrder::Reverse { index, steps } => TurnOrder::Reverse {
                index: (index + len - 1) % len,
                steps: steps + 1,
            },
            TurnOrder::Forward { index } => TurnOrder::Forward {
                index: self.base.next_index(index, len),
            },
        };
        let current = self.current_entity();
        debug!(player = %current.id, "next actor");
        current
    }

    /// The player whose turn it is.
    pub fn current_entity(&self) -> &Player {
        &self.entities[self.order.index()]
    }

    /// Players in forward priority order.
    pub fn entities(&self) -> &[Player] {
        &self.entities
    }

    /// Current traversal state.
    pub fn order(&self) -> TurnOrder {
        self.order
    }

    /// Whether the opening reverse lap is still running.
    pub fn is_reverse(&self) -> bool {
        self.order.is_reverse()
    }
}
