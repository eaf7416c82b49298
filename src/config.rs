//! Scenario configuration: everything a host can tune about a run, with
//! YAML loading and validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default = "default_seed")]
    pub random_seed: u64,
    /// Run length in ticks for hosts that drive a fixed-length run.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Per-tick probability of a random environmental event.
    #[serde(default = "default_event_frequency")]
    pub event_frequency: f64,
    /// Global multiplier on food regeneration.
    #[serde(default = "default_food_modifier")]
    pub food_modifier: f64,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub tribes: TribesConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribesConfig {
    pub count: usize,
}

impl Default for TribesConfig {
    fn default() -> Self {
        Self { count: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Write a snapshot every this many ticks; 0 disables writing.
    #[serde(default)]
    pub every_ticks: u64,
    #[serde(default = "default_snapshot_dir")]
    pub output_dir: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            every_ticks: 0,
            output_dir: default_snapshot_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_seed() -> u64 {
    7
}

fn default_ticks() -> u64 {
    300
}

fn default_event_frequency() -> f64 {
    0.1
}

fn default_food_modifier() -> f64 {
    1.0
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario validation error: {0}")]
    Validation(String),
}

impl Scenario {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.map.width < 1 || self.map.height < 1 {
            return Err(ScenarioError::Validation(format!(
                "map must be at least 1x1, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if self.tribes.count == 0 {
            return Err(ScenarioError::Validation(
                "scenario must start with at least one tribe".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.event_frequency) {
            return Err(ScenarioError::Validation(format!(
                "event_frequency must be a probability, got {}",
                self.event_frequency
            )));
        }
        if self.food_modifier < 0.0 {
            return Err(ScenarioError::Validation(format!(
                "food_modifier must be non-negative, got {}",
                self.food_modifier
            )));
        }
        Ok(())
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "steppe".to_string(),
            random_seed: default_seed(),
            ticks: default_ticks(),
            event_frequency: default_event_frequency(),
            food_modifier: default_food_modifier(),
            map: MapConfig::default(),
            tribes: TribesConfig::default(),
            snapshot: SnapshotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
