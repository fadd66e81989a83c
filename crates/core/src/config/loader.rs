use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are separated by a double underscore, e.g.
/// `INGRESS_PIPELINE__OUTCOME_CAPACITY=50`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("INGRESS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[staging]
root = "/tmp/ingress"

[pipeline]
outcome_capacity = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.pipeline.outcome_capacity, 10);
        assert_eq!(config.staging.root.to_str().unwrap(), "/tmp/ingress");
    }

    #[test]
    fn test_load_config_from_str_missing_staging() {
        let toml = r#"
[pipeline]
outcome_capacity = 10
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[staging]
root = "/var/lib/ingress"

[validator.services]
advisor = []
compliance = ["openscap"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.staging.root.to_str().unwrap(), "/var/lib/ingress");
        assert_eq!(config.validator.services.len(), 2);
        assert_eq!(config.validator.services["compliance"], vec!["openscap"]);
    }
}
