//! Configuration loading

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::NoteportConfig;

/// Overrides the `[logging] level` value
pub const ENV_LOG: &str = "NOTEPORT_LOG";

/// Overrides `[scan] sample_limit`
pub const ENV_SAMPLE_LIMIT: &str = "NOTEPORT_SAMPLE_LIMIT";

/// When set, the per-user config file is never read
pub const ENV_TEST_MODE: &str = "NOTEPORT_TEST_MODE";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist
    #[error("Config file not found: {}", path.display())]
    NotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted key of the offending value
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Loads [`NoteportConfig`] from files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with precedence: defaults < file < env
    ///
    /// An explicit `path` must exist. Without one, the per-user file is read
    /// when present (and [`ENV_TEST_MODE`] is unset).
    pub fn load(path: Option<&Path>) -> Result<NoteportConfig, ConfigError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load_file(path)?
            }
            None => match Self::user_config_path().filter(|p| p.exists()) {
                Some(path) => Self::load_file(&path)?,
                None => {
                    debug!("no config file found, using defaults");
                    NoteportConfig::default()
                }
            },
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Read and parse one TOML file
    pub fn load_file(path: &Path) -> Result<NoteportConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config file");
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<NoteportConfig, ConfigError> {
        let config: NoteportConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// `<config dir>/noteport/config.toml`, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("noteport").join("config.toml"))
    }

    fn user_config_path() -> Option<PathBuf> {
        if std::env::var_os(ENV_TEST_MODE).is_some() {
            return None;
        }
        Self::default_config_path()
    }

    /// Apply environment overrides using `lookup` to read variables
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides<F>(config: &mut NoteportConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.logging.level = level;
        }

        if let Some(raw) = lookup(ENV_SAMPLE_LIMIT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.scan.sample_limit = limit,
                Err(_) => warn!(value = %raw, "ignoring invalid {}", ENV_SAMPLE_LIMIT),
            }
        }
    }

    /// Check value ranges
    pub fn validate(config: &NoteportConfig) -> Result<(), ConfigError> {
        if config.scan.sample_limit == 0 {
            return Err(ConfigError::invalid("scan.sample_limit", "must be at least 1"));
        }
        if config.scan.min_field_percentage > 100 {
            return Err(ConfigError::invalid(
                "scan.min_field_percentage",
                "must be between 0 and 100",
            ));
        }
        if config.scan.extensions.is_empty() {
            return Err(ConfigError::invalid("scan.extensions", "must not be empty"));
        }
        if !config.schema.icon.starts_with("ti-") {
            return Err(ConfigError::invalid(
                "schema.icon",
                format!("'{}' is not a ti- icon", config.schema.icon),
            ));
        }
        if config.schema.item_name.trim().is_empty() {
            return Err(ConfigError::invalid("schema.item_name", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportFormat;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_string_gives_defaults() {
        let config = ConfigLoader::from_toml_str("").unwrap();
        assert_eq!(config, NoteportConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = ConfigLoader::from_toml_str(
            r#"
[scan]
sample_limit = 50

[import]
format = "outline"
"#,
        )
        .unwrap();

        assert_eq!(config.scan.sample_limit, 50);
        assert_eq!(config.scan.example_limit, 5);
        assert_eq!(config.import.format, ImportFormat::Outline);
        assert!(config.import.heading_separators);
        assert_eq!(config.schema.item_name, "Note");
    }

    #[test]
    fn test_parse_error_reported() {
        let err = ConfigLoader::from_toml_str("[scan]\nsample_limit = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = ConfigLoader::from_toml_str("[import]\nformat = \"org\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NoteportConfig::default();
        ConfigLoader::apply_env_overrides(
            &mut config,
            env(&[(ENV_LOG, "debug"), (ENV_SAMPLE_LIMIT, "25")]),
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scan.sample_limit, 25);
    }

    #[test]
    fn test_invalid_env_value_ignored() {
        let mut config = NoteportConfig::default();
        ConfigLoader::apply_env_overrides(&mut config, env(&[(ENV_SAMPLE_LIMIT, "lots")]));
        assert_eq!(config.scan.sample_limit, 500);
    }

    #[test]
    fn test_validation() {
        let mut config = NoteportConfig::default();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.scan.sample_limit = 0;
        let err = ConfigLoader::validate(&config).unwrap_err();
        assert!(err.to_string().contains("scan.sample_limit"));

        let mut config = NoteportConfig::default();
        config.schema.icon = "notebook".to_string();
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("noteport.toml");
        std::fs::write(&path, "[schema]\nitem_name = \"Page\"\nsource_label = \"Logseq\"\n").unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.schema.item_name, "Page");
        assert_eq!(config.schema.source_label, "Logseq");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let err = ConfigLoader::load(Some(&temp.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = NoteportConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(ConfigLoader::from_toml_str(&text).unwrap(), config);
    }
}
