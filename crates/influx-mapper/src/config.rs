// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML configuration for the mapper.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Reserved column name that carries the point timestamp.
pub const DEFAULT_TIME_COLUMN: &str = "time";

/// Retention policy used when a measurement names a database but no policy.
pub const DEFAULT_RETENTION_POLICY: &str = "autogen";

/// Configuration parsing errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Mapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Wire name that gives a column the time role.
    #[serde(default = "default_time_column")]
    pub time_column: String,

    /// Retention policy for writes to an explicit database.
    #[serde(default = "default_retention_policy")]
    pub default_retention_policy: String,
}

fn default_time_column() -> String {
    DEFAULT_TIME_COLUMN.to_string()
}

fn default_retention_policy() -> String {
    DEFAULT_RETENTION_POLICY.to_string()
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            time_column: default_time_column(),
            default_retention_policy: default_retention_policy(),
        }
    }
}

impl MapperConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_column.trim().is_empty() {
            return Err(ConfigError::Invalid("time_column must not be empty".into()));
        }
        if self.default_retention_policy.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_retention_policy must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.time_column, "time");
        assert_eq!(config.default_retention_policy, "autogen");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_partial_yaml() {
        let config = MapperConfig::from_yaml("default_retention_policy: one_week\n")
            .expect("parse partial yaml");
        assert_eq!(config.time_column, "time");
        assert_eq!(config.default_retention_policy, "one_week");
    }

    #[test]
    fn test_config_parse_all_fields() {
        let yaml = r#"
time_column: "ts"
default_retention_policy: "raw"
"#;
        let config = MapperConfig::from_yaml(yaml).expect("parse full yaml");
        assert_eq!(config.time_column, "ts");
        assert_eq!(config.default_retention_policy, "raw");
    }

    #[test]
    fn test_config_rejects_empty_time_column() {
        let err = MapperConfig::from_yaml("time_column: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_rejects_bad_yaml() {
        let err = MapperConfig::from_yaml("time_column: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "time_column: timestamp").expect("write");

        let config = MapperConfig::from_file(file.path()).expect("load");
        assert_eq!(config.time_column, "timestamp");

        let err = MapperConfig::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
