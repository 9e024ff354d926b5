use std::{collections::HashSet, fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    board::Board,
    game::{GameLog, GameState},
    market::StockMarket,
    models::Player,
};

use super::models::RawScenario;

static HEX_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+\d+$").expect("failed to compile hex id regex"));

/// Builds a [`GameState`] from a JSON scenario file.
#[derive(Debug, Clone)]
pub struct ScenarioLoader {
    currency_format: String,
}

impl ScenarioLoader {
    pub fn new(currency_format: impl Into<String>) -> Self {
        Self {
            currency_format: currency_format.into(),
        }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<GameState> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        self.parse(&content)
            .with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn parse(&self, content: &str) -> Result<GameState> {
        let raw: RawScenario =
            serde_json::from_str(content).context("failed to parse scenario payload")?;
        self.build_state(raw)
    }

    fn build_state(&self, raw: RawScenario) -> Result<GameState> {
        let players: Vec<Player> = raw.players.into_iter().map(Player::from).collect();
        if players.is_empty() {
            bail!("scenario has no players");
        }
        ensure_unique("player", players.iter().map(|p| p.id.as_str()))?;
        ensure_unique("corporation", raw.corporations.iter().map(|c| c.sym.as_str()))?;
        ensure_unique("company", raw.companies.iter().map(|c| c.sym.as_str()))?;

        for hex in &raw.hexes {
            validate_hex_id(&hex.id)?;
        }

        let market = StockMarket::from_rows(&raw.market);
        for corp in &raw.corporations {
            validate_hex_id(&corp.coordinates)
                .with_context(|| format!("corporation {} home", corp.sym))?;
            if let Some(position) = corp.share_price {
                if market.price(position).is_none() {
                    bail!(
                        "corporation {} share price ({}, {}) is not on the market",
                        corp.sym,
                        position.row,
                        position.col
                    );
                }
            }
        }

        debug!(
            title = raw.title.as_deref().unwrap_or("untitled"),
            players = players.len(),
            corporations = raw.corporations.len(),
            companies = raw.companies.len(),
            "scenario loaded"
        );

        Ok(GameState::new(
            players,
            raw.corporations,
            raw.companies,
            Board::new(raw.hexes),
            market,
            GameLog::new(self.currency_format.clone()),
        ))
    }
}

fn validate_hex_id(id: &str) -> Result<()> {
    if HEX_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(anyhow!("invalid hex coordinate '{id}'"))
    }
}

fn ensure_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            bail!("duplicate {what} '{id}'");
        }
    }
    Ok(())
}
