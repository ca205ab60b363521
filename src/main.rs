// ABOUTME: Terminal entry point that replays a line-delimited JSON event stream into the host view
// ABOUTME: Reads events from a file or stdin and prints the sorted table and counters after each update

use anyhow::{Context, Result};
use pingu_view::app::AppState;
use pingu_view::config::Config;
use pingu_view::reconciler::CountsSink;
use pingu_view::ui::{HostTable, SummaryPanel};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::Level;

fn init_logging() {
    let level = if std::env::var("PINGU_DEBUG").is_ok() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> Config {
    let loaded = Config::default_config_path().and_then(|path| Config::load_or_create(&path));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config: {e:#}. Using defaults.");
            Config::default()
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = load_config();
    let events_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.feed.events_path.as_ref().map(PathBuf::from));

    let table = HostTable::new(io::stdout(), config.latency);
    let panels: Vec<Box<dyn CountsSink>> = vec![
        Box::new(SummaryPanel::new("Summary", io::stdout())),
        Box::new(SummaryPanel::new("Dashboard", io::stdout())),
    ];
    let mut app = AppState::new(config, Box::new(table), panels)?;

    match events_path {
        Some(path) => {
            tracing::info!("Reading host events from {}", path.display());
            let file = File::open(&path)
                .with_context(|| format!("Failed to open event file: {}", path.display()))?;
            app.run(BufReader::new(file))?;
        }
        None => {
            tracing::info!("Reading host events from stdin");
            app.run(io::stdin().lock())?;
        }
    }

    if let Some(error) = &app.error_message {
        tracing::warn!("Last command error: {error}");
    }

    Ok(())
}
