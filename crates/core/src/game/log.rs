//! User-visible game log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default currency template; `{}` is replaced with the amount.
pub const DEFAULT_CURRENCY_FORMAT: &str = "{} G";

/// One line of the narrative log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Message as shown to players.
    pub message: String,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

/// Append-only narrative of what happened in the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vec<LogEntry>,
    currency_format: String,
}

impl Default for GameLog {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_FORMAT)
    }
}

impl GameLog {
    /// Empty log formatting amounts with `currency_format`.
    pub fn new(currency_format: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            currency_format: currency_format.into(),
        }
    }

    /// Append a line.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Record a share price transition; unchanged prices are not logged.
    pub fn log_share_price(&mut self, name: &str, from: i32, to: i32) {
        if from == to {
            return;
        }
        let from = self.format_currency(from);
        let to = self.format_currency(to);
        self.push(format!("{name}'s share price changes from {from} to {to}"));
    }

    /// Render an amount with the configured currency template.
    pub fn format_currency(&self, amount: i32) -> String {
        if self.currency_format.contains("{}") {
            self.currency_format.replacen("{}", &amount.to_string(), 1)
        } else {
            format!("{}{amount}", self.currency_format)
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages only, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
