//! Two-dimensional stock market grid.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Position of a share price token on the market grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketPosition {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

/// Stock market built from raw engine-style rows (`"100"`, `"110p"`, `""`).
#[derive(Debug, Clone, Default)]
pub struct StockMarket {
    prices: HashMap<MarketPosition, i32>,
}

impl StockMarket {
    /// Parse rows of raw cells; blank or non-numeric cells are not on the market.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let mut prices = HashMap::new();
        for (row, cells) in rows.iter().enumerate() {
            for (col, raw) in cells.iter().enumerate() {
                if let Some(value) = parse_price(raw.as_ref()) {
                    prices.insert(MarketPosition { row, col }, value);
                }
            }
        }
        Self { prices }
    }

    /// Price at `position`, if that cell exists.
    pub fn price(&self, position: MarketPosition) -> Option<i32> {
        self.prices.get(&position).copied()
    }

    /// Position a sold out corporation moves to: one row up if that cell exists.
    pub fn sold_out_move(&self, position: MarketPosition) -> MarketPosition {
        if position.row == 0 {
            return position;
        }
        let above = MarketPosition {
            row: position.row - 1,
            col: position.col,
        };
        if self.prices.contains_key(&above) {
            above
        } else {
            position
        }
    }
}

fn parse_price(raw: &str) -> Option<i32> {
    RAW_NUMBER_RE
        .captures(raw)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

static RAW_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)").expect("failed to compile market numeric regex"));
