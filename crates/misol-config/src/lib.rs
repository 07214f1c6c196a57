use misol_core::StationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the daemon takes its bytes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Simulator,
    Replay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub source: SourceKind,

    /// Capture file for the replay source (binary, or `.hex` text)
    pub replay_path: Option<PathBuf>,

    /// Bytes released by the replay source per poll
    pub replay_chunk: usize,

    /// Seconds between simulated frames
    pub simulator_period_secs: u64,

    pub poll_interval_ms: u64,

    /// Directory for JSONL snapshots; disabled when unset
    pub jsonl_dir: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            replay_path: None,
            replay_chunk: 21,
            simulator_period_secs: 16,
            poll_interval_ms: 50,
            jsonl_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub station: StationSettings,
    pub daemon: DaemonConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load configuration from MISOL_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MISOL_CONFIG").unwrap_or_else(|_| "misol.toml".to_string());
        Self::load_from(path)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            Self::from_toml_str(&s)?
        } else {
            AppConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<AppConfig>(s)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let station = &self.station;
        if !(-180..=180).contains(&station.north_correction) {
            return Err(ConfigError::Invalid(format!(
                "north_correction {} outside -180..=180",
                station.north_correction
            )));
        }
        if station.precipitation_intensity_interval == 0 {
            return Err(ConfigError::Invalid(
                "precipitation_intensity_interval must be at least one minute".into(),
            ));
        }
        let threshold = station.night_threshold;
        if threshold.lower > threshold.upper {
            return Err(ConfigError::Invalid(format!(
                "night threshold lower {} above upper {}",
                threshold.lower, threshold.upper
            )));
        }
        if self.daemon.source == SourceKind::Replay && self.daemon.replay_path.is_none() {
            return Err(ConfigError::Invalid(
                "replay source needs replay_path".into(),
            ));
        }
        if self.daemon.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.daemon.poll_interval_ms)
    }

    pub fn simulator_period(&self) -> Duration {
        Duration::from_secs(self.daemon.simulator_period_secs)
    }
}
