//! Configuration file (~/.eqtail/config.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::watcher::tailer::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_NOISE_BACKOFF, DEFAULT_POLL_INTERVAL,
};
use crate::watcher::{log_path, AlertConfig, TailOptions};

/// Settings read from the config file. Every key is optional.
///
/// ```toml
/// from_start = false
/// poll_interval_ms = 6000
/// noise_backoff_ms = 3000
/// base_path = "C:/EverQuest"
/// player = "patchouli"
/// server = "firiona"
///
/// [[alerts]]
/// name = "bids"
/// pattern = "(?i)bids"
/// channels = ["guild"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub from_start: bool,
    pub poll_interval_ms: u64,
    pub noise_backoff_ms: u64,
    pub channel_capacity: usize,
    pub base_path: Option<PathBuf>,
    pub player: Option<String>,
    pub server: Option<String>,
    pub alerts: Vec<AlertConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            from_start: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            noise_backoff_ms: DEFAULT_NOISE_BACKOFF.as_millis() as u64,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            base_path: None,
            player: None,
            server: None,
            alerts: Vec::new(),
        }
    }
}

impl Config {
    /// Default config location.
    pub fn default_path() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(home.join(".eqtail").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location if it
    /// exists. An explicit path that is missing is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.noise_backoff_ms >= self.poll_interval_ms {
            return Err(Error::InvalidConfig(format!(
                "noise_backoff_ms ({}) must be shorter than poll_interval_ms ({})",
                self.noise_backoff_ms, self.poll_interval_ms
            )));
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "channel_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tail_options(&self) -> TailOptions {
        TailOptions {
            from_start: self.from_start,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            noise_backoff: Duration::from_millis(self.noise_backoff_ms),
        }
    }

    /// Log path built from `base_path`, `player` and `server`, when all
    /// three are set.
    pub fn log_path(&self) -> Option<PathBuf> {
        match (&self.base_path, &self.player, &self.server) {
            (Some(base), Some(player), Some(server)) => Some(log_path(player, server, base)),
            _ => None,
        }
    }
}
