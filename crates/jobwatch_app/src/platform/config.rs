//! RON configuration for the terminal front-end.
//!
//! A missing file means defaults; every field may be omitted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::LogDestination;
use jobwatch_engine::{StreamSettings, DEFAULT_ENDPOINT};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub log_destination: LogTarget,
    pub log_file: PathBuf,
    pub log_level: String,
    pub transcript_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 10,
            log_destination: LogTarget::File,
            log_file: PathBuf::from("./jobwatch.log"),
            log_level: "info".to_string(),
            transcript_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(dir) = &cli.transcript_dir {
            self.transcript_dir = Some(dir.clone());
        }
    }

    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_destination {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    /// `None` when `log_level` names no level. The caller warns once a logger exists.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.log_level.parse().ok()
    }
}
