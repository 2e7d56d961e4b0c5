//! RON configuration for the demo driver

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Length of one driver tick in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Number of ticks to run after the scripted session
    #[serde(default = "default_run_ticks")]
    pub run_ticks: u64,
    /// Sleep for `tick_ms` between ticks
    #[serde(default)]
    pub realtime: bool,
    /// Seed for generated ages
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Periodic person generator
    #[serde(default)]
    pub people: PersonGenerator,
    /// Periodic animal generator
    #[serde(default)]
    pub animals: AnimalGenerator,
    /// Dispatch journal settings
    #[serde(default)]
    pub journal: JournalSettings,
}

fn default_tick_ms() -> u64 {
    100
}

fn default_run_ticks() -> u64 {
    160
}

fn default_seed() -> u64 {
    42
}

fn default_max_age() -> u32 {
    100
}

/// Adds a person every `every_ms` (0 disables)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonGenerator {
    #[serde(default = "default_person_every")]
    pub every_ms: u64,
    #[serde(default = "default_person_name")]
    pub name: String,
    #[serde(default = "default_occupation")]
    pub occupation: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// Ages are drawn from `0..max_age`
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

fn default_person_every() -> u64 {
    3000
}

fn default_person_name() -> String {
    "New Person :D New one every 3 seconds!".to_string()
}

fn default_occupation() -> String {
    "Unemployed".to_string()
}

fn default_location() -> String {
    "Somewhere in the World".to_string()
}

impl Default for PersonGenerator {
    fn default() -> Self {
        Self {
            every_ms: default_person_every(),
            name: default_person_name(),
            occupation: default_occupation(),
            location: default_location(),
            max_age: default_max_age(),
        }
    }
}

/// Adds an animal every `every_ms` (0 disables)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnimalGenerator {
    #[serde(default = "default_animal_every")]
    pub every_ms: u64,
    #[serde(default = "default_animal_name")]
    pub name: String,
    #[serde(default = "default_species")]
    pub species: String,
    #[serde(default = "default_breed")]
    pub breed: String,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

fn default_animal_every() -> u64 {
    5000
}

fn default_animal_name() -> String {
    "New Animal (,,,/(;,,;)/,,,) New one every 5 seconds!".to_string()
}

fn default_species() -> String {
    "Pokemon".to_string()
}

fn default_breed() -> String {
    "Water".to_string()
}

impl Default for AnimalGenerator {
    fn default() -> Self {
        Self {
            every_ms: default_animal_every(),
            name: default_animal_name(),
            species: default_species(),
            breed: default_breed(),
            max_age: default_max_age(),
        }
    }
}

/// Journal recording settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Snapshot every N dispatches (0 = only the initial snapshot)
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u64,
    /// Maximum entries kept (0 = unlimited)
    #[serde(default)]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_snapshot_interval() -> u64 {
    5
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_interval: default_snapshot_interval(),
            max_entries: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            run_ticks: default_run_ticks(),
            realtime: false,
            seed: default_seed(),
            people: PersonGenerator::default(),
            animals: AnimalGenerator::default(),
            journal: JournalSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse and validate RON text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Validation("tick_ms must be positive".to_string()));
        }
        if self.people.max_age == 0 || self.animals.max_age == 0 {
            return Err(ConfigError::Validation("max_age must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
