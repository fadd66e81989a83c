use super::{types::AnnouncerBackend, types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Staging section exists (enforced by serde) with a non-empty root
/// - Pipeline service name is set and buffers are non-zero
/// - At least one service is accepted
/// - JSON lines announcer has an output path
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.staging.root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "staging.root cannot be empty".to_string(),
        ));
    }

    if config.pipeline.service_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.service_name cannot be empty".to_string(),
        ));
    }

    if config.pipeline.outcome_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.outcome_capacity cannot be 0".to_string(),
        ));
    }

    if config.pipeline.tracker_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.tracker_buffer cannot be 0".to_string(),
        ));
    }

    if config.validator.services.is_empty() {
        return Err(ConfigError::ValidationError(
            "validator.services must list at least one service".to_string(),
        ));
    }

    if config.announcer.backend == AnnouncerBackend::JsonLines && config.announcer.path.is_none()
    {
        return Err(ConfigError::ValidationError(
            "announcer.path must be set when backend = \"json_lines\"".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base() -> Config {
        load_config_from_str(
            r#"
[staging]
root = "/tmp/stage"

[validator.services]
advisor = []
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn test_validate_zero_capacity_fails() {
        let mut config = base();
        config.pipeline.outcome_capacity = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_blank_service_name_fails() {
        let mut config = base();
        config.pipeline.service_name = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_no_services_fails() {
        let mut config = base();
        config.validator.services.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_json_lines_requires_path() {
        let mut config = base();
        config.announcer.backend = AnnouncerBackend::JsonLines;
        assert!(validate_config(&config).is_err());

        config.announcer.path = Some("/tmp/events.jsonl".into());
        assert!(validate_config(&config).is_ok());
    }
}
