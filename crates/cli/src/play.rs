use anyhow::Result;
use serde::Serialize;
use stockround_core::{FirstStockRound, GameState, RoundSummary};
use tracing::info;

/// Outcome of playing the first stock round with every player passing.
#[derive(Debug, Serialize)]
pub struct PlayReport {
    pub description: String,
    pub initial_order: Vec<String>,
    pub turns: Vec<String>,
    pub summary: RoundSummary,
}

/// Set up the round, let `turns` players pass in turn order, then finish it.
pub fn play_passes(state: &mut GameState, turns: usize) -> Result<PlayReport> {
    let mut round = FirstStockRound::new(state)?;
    let description = round.description().to_string();
    let initial_order = round
        .select_entities()
        .into_iter()
        .map(|player| player.name)
        .collect();

    round.setup()?;
    info!(turns, "{description} started");

    let mut played = Vec::with_capacity(turns);
    for _ in 0..turns {
        let name = round.next_entity().name.clone();
        state.log_mut().push(format!("{name} passes"));
        played.push(name);
    }

    let summary = round.finish(state)?;
    Ok(PlayReport {
        description,
        initial_order,
        turns: played,
        summary,
    })
}
