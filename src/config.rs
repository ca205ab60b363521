// ABOUTME: Configuration structures and parsing for the host view settings
// ABOUTME: Controls the initial sort order, the push-time direction flip, latency thresholds and the event source

use crate::host::LatencyThresholds;
use crate::sort::{SortDirection, SortKey, SortState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub view: ViewConfig,
    pub latency: LatencyThresholds,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ViewConfig {
    pub sort_key: String,
    pub sort_direction: String,
    #[serde(default = "default_flip_on_snapshot")]
    pub flip_on_snapshot: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FeedConfig {
    pub events_path: Option<String>,
}

fn default_flip_on_snapshot() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            view: ViewConfig {
                sort_key: "ip".to_string(),
                sort_direction: "asc".to_string(),
                flip_on_snapshot: true,
            },
            latency: LatencyThresholds::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# Ping ü host view configuration

[view]
# Column the table is sorted by at startup:
# ip, nom, mac, port, latence, temp, commentaire
sort_key = "ip"
# asc or desc
sort_direction = "asc"
# Invert the sort direction every time the server pushes a new host list.
# This mirrors the dashboard's live refresh; set to false to keep the order steady.
flip_on_snapshot = true

[latency]
# Latency badge thresholds in milliseconds (exclusive upper bounds)
excellent_below_ms = 20.0
good_below_ms = 50.0
warning_below_ms = 100.0

[feed]
# Line-delimited JSON events to read when no file is given on the command line.
# Leave unset to read from stdin.
# events_path = "~/pingu/events.jsonl"
"#
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("pingu-view").join("config.toml"))
    }

    pub fn expand_path(&mut self) -> Result<()> {
        if let Some(path) = &self.feed.events_path {
            self.feed.events_path = Some(expand_tilde(path)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.initial_sort()?;

        let t = &self.latency;
        if t.excellent_below_ms <= 0.0 {
            anyhow::bail!("Latency thresholds must be positive");
        }
        if !(t.excellent_below_ms < t.good_below_ms && t.good_below_ms < t.warning_below_ms) {
            anyhow::bail!("Latency thresholds must be strictly increasing");
        }

        if let Some(path) = &self.feed.events_path {
            if path.trim().is_empty() {
                anyhow::bail!("events_path cannot be empty");
            }
        }

        Ok(())
    }

    pub fn initial_sort(&self) -> Result<SortState> {
        let key: SortKey = self.view.sort_key.parse()?;
        let direction: SortDirection = self.view.sort_direction.parse()?;
        Ok(SortState::new(key, direction))
    }

    pub fn save_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }

    /// Loads the user's config, writing the default file on first run.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::save_default_config(path)?;
            tracing::info!("Created default configuration at: {}", path.display());
        }

        let mut config = Self::load_from_file(path)?;
        config.expand_path()?;
        config.validate()?;
        Ok(config)
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}
