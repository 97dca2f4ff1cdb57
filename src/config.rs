//! Configuration for the focus watchdog.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Tunable thresholds for the detection checks.
///
/// Intervals and cooldowns are stored as millisecond counts on disk so the
/// config file stays readable next to the webhook URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Shortest cooldown between capture windows
    #[serde(with = "duration_millis")]
    pub check_interval_min: Duration,

    /// Longest cooldown between capture windows
    #[serde(with = "duration_millis")]
    pub check_interval_max: Duration,

    /// Phone detection sensitivity in [0, 1]
    pub phone_detection_threshold: f64,

    /// Sleep detection sensitivity in [0, 1]
    pub sleep_detection_threshold: f64,

    /// How long without input counts as inactivity
    #[serde(with = "duration_millis")]
    pub inactivity_threshold: Duration,

    /// Minimum gap between surfaced distraction alerts
    #[serde(with = "duration_millis")]
    pub distraction_cooldown: Duration,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            check_interval_min: Duration::from_millis(5000),
            check_interval_max: Duration::from_millis(15000),
            phone_detection_threshold: 0.7,
            sleep_detection_threshold: 0.6,
            inactivity_threshold: Duration::from_millis(30000),
            distraction_cooldown: Duration::from_millis(60000),
        }
    }
}

impl DetectionSettings {
    /// Check that the settings describe a usable configuration.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.check_interval_min > self.check_interval_max {
            return Err(SettingsError::IntervalOrder {
                min: self.check_interval_min,
                max: self.check_interval_max,
            });
        }
        for (name, value) in [
            ("phone_detection_threshold", self.phone_detection_threshold),
            ("sleep_detection_threshold", self.sleep_detection_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(SettingsError::ThresholdRange { name, value });
            }
        }
        Ok(())
    }
}

/// Settings validation errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("check_interval_min ({min:?}) exceeds check_interval_max ({max:?})")]
    IntervalOrder { min: Duration, max: Duration },

    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdRange { name: &'static str, value: f64 },
}

/// Main configuration for the watchdog agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Detection thresholds and timing
    pub settings: DetectionSettings,

    /// Webhook endpoint for alert delivery
    pub webhook_url: Option<String>,

    /// Length of each active capture window
    #[serde(with = "duration_millis")]
    pub window_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: DetectionSettings::default(),
            webhook_url: None,
            window_duration: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("focus-watchdog")
            .join("config.json")
    }

    /// Webhook URL with the environment variable taking precedence
    /// over the config file.
    pub fn effective_webhook_url(&self) -> Option<String> {
        std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.webhook_url.clone())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serde support for Duration as whole milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
