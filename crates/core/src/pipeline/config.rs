//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use super::controller::DEFAULT_SERVICE_NAME;

/// Configuration for the pipeline controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Service name stamped on every status record.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Outcomes each channel buffers before validators block.
    #[serde(default = "default_outcome_capacity")]
    pub outcome_capacity: usize,

    /// Status records buffered in front of the tracker sink.
    #[serde(default = "default_tracker_buffer")]
    pub tracker_buffer: usize,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_outcome_capacity() -> usize {
    100
}

fn default_tracker_buffer() -> usize {
    1000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            outcome_capacity: default_outcome_capacity(),
            tracker_buffer: default_tracker_buffer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.service_name, "ingress");
        assert_eq!(config.outcome_capacity, 100);
        assert_eq!(config.tracker_buffer, 1000);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PipelineConfig = toml::from_str(
            r#"
            outcome_capacity = 8
        "#,
        )
        .unwrap();
        assert_eq!(config.service_name, "ingress");
        assert_eq!(config.outcome_capacity, 8);
    }
}
