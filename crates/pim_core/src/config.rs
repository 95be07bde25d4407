//! Application configuration.
//!
//! # Responsibility
//! - Provide typed settings with defaults for storage, logging and limits.
//! - Load overrides from an optional TOML file.
//!
//! # Invariants
//! - Every field has a default; an empty file is a valid configuration.
//! - A loaded configuration has a non-empty database path and a non-empty
//!   year-of-passing range.

use crate::logging::default_log_level;
use crate::model::education::PassingYearRange;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "personal_info.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub min_passing_year: i32,
    pub max_passing_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let years = PassingYearRange::default();
        Self {
            min_passing_year: years.min,
            max_passing_year: years.max,
        }
    }
}

impl LimitsConfig {
    pub fn passing_years(&self) -> PassingYearRange {
        PassingYearRange {
            min: self.min_passing_year,
            max: self.max_passing_year,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text).map_err(|err| match err {
                    ConfigError::Parse { source, .. } => ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    },
                    other => other,
                })?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".to_string()));
        }
        if self.limits.min_passing_year > self.limits.max_passing_year {
            return Err(ConfigError::Invalid(format!(
                "limits.min_passing_year {} exceeds limits.max_passing_year {}",
                self.limits.min_passing_year, self.limits.max_passing_year
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn empty_text_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.limits.max_passing_year, 2050);
        assert_eq!(config.logging.dir, None);
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            path = "/var/lib/pim/people.db"

            [limits]
            max_passing_year = 2040
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/pim/people.db"));
        assert_eq!(config.limits.max_passing_year, 2040);
        assert_eq!(config.limits.min_passing_year, 1901);
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let err = AppConfig::from_toml_str(
            "[limits]\nmin_passing_year = 2000\nmax_passing_year = 1999\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml_str("[database]\nhost = \"localhost\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reads_file_and_reports_its_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "warn");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[logging").unwrap();
        match AppConfig::load(Some(broken.path())).unwrap_err() {
            ConfigError::Parse { path, .. } => assert_eq!(path, broken.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
