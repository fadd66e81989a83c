use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::pipeline::PipelineConfig;
use crate::validators::SimulationConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub staging: StagingConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub announcer: AnnouncerConfig,
    #[serde(default)]
    pub inventory: Option<InventoryConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where payloads are staged
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StagingConfig {
    pub root: PathBuf,
}

/// Validator configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidatorConfig {
    /// Accepted services and their categories (empty list = any category)
    #[serde(default)]
    pub services: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Announcement and status destination
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnnouncerConfig {
    #[serde(default)]
    pub backend: AnnouncerBackend,
    /// Output file (required when backend = "json_lines")
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncerBackend {
    #[default]
    Log,
    JsonLines,
}

/// Inventory lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryConfig {
    /// Id returned for every request
    pub static_id: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
