//! Application configuration loaded from TOML and `STOCKROUND_*` variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::game::log::DEFAULT_CURRENCY_FORMAT;

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "stockround";

const DEFAULT_CONFIG: &str = r#"# Currency template for the game log; {} is replaced with the amount.
currency_format = "{} G"

# Directory for diagnostic log files.
log_dir = "logs"

# Number of passing turns the CLI plays before finishing the round.
# Defaults to two laps of the player roster.
# pass_turns = 8
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Currency template used by the game log.
    pub currency_format: String,
    /// Directory for diagnostic log files.
    pub log_dir: PathBuf,
    /// Passing turns the CLI simulates; `None` means two laps.
    pub pass_turns: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_format: DEFAULT_CURRENCY_FORMAT.to_string(),
            log_dir: PathBuf::from("logs"),
            pass_turns: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) layered under environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("currency_format", defaults.currency_format)?
            .set_default("log_dir", defaults.log_dir.to_string_lossy().to_string())?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("STOCKROUND").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Turns the CLI should play for a roster of `players`.
    pub fn turns_for(&self, players: usize) -> usize {
        self.pass_turns.unwrap_or(players * 2)
    }
}

/// Default config file location.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the default config to `path` unless a file is already there.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))
}
