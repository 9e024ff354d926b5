mod play;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use tracing_subscriber::{prelude::*, EnvFilter};
use stockround_core::{
    config::{self, AppConfig},
    ScenarioLoader,
};

const USAGE: &str = "usage: first-stock <scenario.json>";

fn main() -> Result<()> {
    let scenario_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context(USAGE)?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;

    let loader = ScenarioLoader::new(config.currency_format.clone());
    let mut state = loader.load(&scenario_path)?;
    let turns = config.turns_for(state.players().len());

    let report = play::play_passes(&mut state, turns)?;

    println!("{}", report.description);
    println!("Initial order: {}", report.initial_order.join(", "));
    println!();
    for entry in state.log().entries() {
        println!("[{}] {}", entry.at.format("%H:%M:%S"), entry.message);
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&report.summary)?);

    Ok(())
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("first-stock.log");

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
