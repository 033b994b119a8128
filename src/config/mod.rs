//! Configuration management
//!
//! This module handles loading and parsing configuration for the Elev8 API.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Contact form configuration
    #[serde(default)]
    pub contact: ContactConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin, `*` allows any origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// Database configuration
///
/// Without a URL the service still starts, but every datastore route
/// answers with "Database not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseConfig {
    /// Whether a connection URL has been supplied
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().map_or(false, |url| !url.trim().is_empty())
    }
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Contact form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Collection that receives contact submissions
    #[serde(default = "default_contact_collection")]
    pub collection: String,
    /// Fields every submission must carry as non-blank strings
    ///
    /// The frontend's form decides the real field set. The default is a
    /// placeholder for the usual name/email/message form and should be
    /// replaced to match the deployed form; an empty list accepts any object.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,
    /// Maximum length of any string field, in characters
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            collection: default_contact_collection(),
            required_fields: default_required_fields(),
            max_field_length: default_max_field_length(),
        }
    }
}

fn default_contact_collection() -> String {
    "contactmessage".to_string()
}

fn default_required_fields() -> Vec<String> {
    vec!["name".to_string(), "email".to_string(), "message".to_string()]
}

fn default_max_field_length() -> usize {
    5000
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - ELEV8_SERVER_HOST
    /// - ELEV8_SERVER_PORT
    /// - ELEV8_SERVER_CORS_ORIGIN
    /// - ELEV8_DATABASE_DRIVER
    /// - ELEV8_DATABASE_URL (falls back to DATABASE_URL)
    /// - ELEV8_CONTACT_COLLECTION
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("ELEV8_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ELEV8_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("ELEV8_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("ELEV8_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("ELEV8_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            self.database.url = Some(url);
        }

        if let Ok(collection) = std::env::var("ELEV8_CONTACT_COLLECTION") {
            self.contact.collection = collection;
        }
    }

    /// Reject settings that would make the service misbehave at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::db::repositories::document::validate_collection_name(&self.contact.collection)
            .map_err(|e| ConfigError::ValidationError(format!("contact.collection: {}", e)))?;
        if self.contact.required_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "contact.required_fields must not contain empty names".to_string(),
            ));
        }
        if self.contact.max_field_length == 0 {
            return Err(ConfigError::ValidationError(
                "contact.max_field_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());


/// Property-based tests for configuration parsing
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_config_strategy() -> impl Strategy<Value = Config> {
        (
            prop_oneof![Just("0.0.0.0".to_string()), Just("127.0.0.1".to_string()), "[a-z][a-z0-9]{0,10}"],
            1u16..=65535,
            prop_oneof![Just(DatabaseDriver::Sqlite), Just(DatabaseDriver::Mysql)],
            prop::option::of("[a-z][a-z0-9_/]{0,20}\\.db"),
            "[a-z][a-z0-9_]{0,20}",
            1usize..=10000,
        )
            .prop_map(|(host, port, driver, url, collection, max_field_length)| Config {
                server: ServerConfig {
                    host,
                    port,
                    cors_origin: "*".to_string(),
                },
                database: DatabaseConfig { driver, url },
                contact: ContactConfig {
                    collection,
                    required_fields: vec!["email".to_string()],
                    max_field_length,
                },
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        #[test]
        fn config_yaml_roundtrip(config in valid_config_strategy()) {
            let yaml = serde_yaml::to_string(&config).unwrap();
            let mut file = NamedTempFile::new().unwrap();
            write!(file, "{}", yaml).unwrap();

            let loaded = Config::load(file.path()).unwrap();
            prop_assert_eq!(loaded.server.host, config.server.host);
            prop_assert_eq!(loaded.server.port, config.server.port);
            prop_assert_eq!(loaded.database.driver, config.database.driver);
            prop_assert_eq!(loaded.database.url, config.database.url);
            prop_assert_eq!(loaded.contact.collection, config.contact.collection);
            prop_assert_eq!(loaded.contact.max_field_length, config.contact.max_field_length);
        }
    }
}
