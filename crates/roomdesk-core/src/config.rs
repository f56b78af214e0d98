//! Configuration management for `roomdesk`

use crate::{Error, Result, types::DEFAULT_ROOM_DESCRIPTION};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `ROOMDESK__API__BASE_URL`
pub const ENV_PREFIX: &str = "ROOMDESK";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Booking API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// List pipeline defaults
    #[serde(default)]
    pub listing: ListingConfig,

    /// Form defaults
    #[serde(default)]
    pub forms: FormsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Booking API connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Optional key sent as `X-API-Key`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// List pipeline defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingConfig {
    /// Rows per page when a tab is opened
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes the operator may pick from
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

/// Form defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormsConfig {
    /// Description sent with rooms whose description field is left blank
    #[serde(default = "default_room_description")]
    pub default_room_description: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5157".to_string()
}

const fn default_page_size() -> usize {
    5
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 15]
}

fn default_room_description() -> String {
    DEFAULT_ROOM_DESCRIPTION.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            api_key: None,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            default_room_description: default_room_description(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from `roomdesk.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name("roomdesk").required(false))
    }

    /// Load configuration from an explicit file, still honouring the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unparsable or invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(|built| built.try_deserialize::<Self>())
            .map_err(|e| Error::Configuration {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Configuration {
                message: "api.base_url must not be empty".to_string(),
            });
        }
        if self.listing.page_size == 0 || self.listing.page_size_options.contains(&0) {
            return Err(Error::Configuration {
                message: "page sizes must be positive".to_string(),
            });
        }
        if !self.listing.page_size_options.contains(&self.listing.page_size) {
            return Err(Error::Configuration {
                message: format!(
                    "listing.page_size {} is not one of {:?}",
                    self.listing.page_size, self.listing.page_size_options
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:5157");
        assert!(config.api.timeout_seconds.is_none());
        assert!(config.api.api_key.is_none());
        assert_eq!(config.listing.page_size, 5);
        assert_eq!(config.listing.page_size_options, vec![5, 10, 15]);
        assert_eq!(config.forms.default_room_description, "Ruangan Kampus");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "api": {"base_url": "http://rooms.internal:8080"},
            "logging": {"format": "json"}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.api.base_url, "http://rooms.internal:8080");
        assert_eq!(config.listing.page_size, 5); // Uses default
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn"); // Uses default
    }

    #[test]
    fn test_validate_rejects_unknown_page_size() {
        let mut config = Config::default();
        config.listing.page_size = 7;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listing.page_size 7"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.listing.page_size_options = vec![0, 5];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://127.0.0.1:9000"
timeout_seconds = 15

[listing]
page_size = 10

[forms]
default_room_description = "Ruang Rapat"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_seconds, Some(15));
        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.listing.page_size_options, vec![5, 10, 15]);
        assert_eq!(config.forms.default_room_description, "Ruang Rapat");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
