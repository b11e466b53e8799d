//! Configuration management
//!
//! Loads the s3interact configuration file. The file is stored in TOML
//! format at `$S3INTERACT_CONFIG_DIR/config.toml` or, when that variable
//! is unset, under the platform config directory. Credentials are never
//! part of this file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "S3INTERACT_CONFIG_DIR";

/// Region used when neither the operator nor the config names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Endpoint settings
    #[serde(default)]
    pub connection: Connection,
}

/// Default settings for the interactive session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Region used when the region prompt is left blank
    #[serde(default = "default_region")]
    pub region: String,

    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Show progress bars for batch operations
    #[serde(default = "default_true")]
    pub progress: bool,
}

/// Where and how to reach the storage service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connection {
    /// Custom S3-compatible endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            region: default_region(),
            color: default_color(),
            progress: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            connection: Connection::default(),
        }
    }
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.defaults.color.as_str(), "auto" | "always" | "never") {
            return Err(Error::Config(format!(
                "color must be one of auto, always, never (got '{}')",
                self.defaults.color
            )));
        }
        if self.defaults.region.trim().is_empty() {
            return Err(Error::Config("default region cannot be empty".into()));
        }
        if let Some(endpoint) = &self.connection.endpoint {
            url::Url::parse(endpoint)?;
        }
        Ok(())
    }
}

/// Configuration manager handles locating and loading config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("s3interact"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    #[cfg(test)]
    fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. \
                 Please upgrade s3interact.",
                config.schema_version, SCHEMA_VERSION
            )));
        }
        config.schema_version = SCHEMA_VERSION;
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Manager reading `config.toml` with `content`, or no file when `None`
    fn manager_with(content: Option<&str>) -> (ConfigManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        (ConfigManager::with_path(path), dir)
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let (manager, _dir) = manager_with(None);
        let config = manager.load().unwrap();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.defaults.region, DEFAULT_REGION);
        assert_eq!(config.defaults.color, "auto");
        assert!(config.defaults.progress);
        assert_eq!(config.connection.endpoint, None);
        assert!(!config.connection.force_path_style);
    }

    #[test]
    fn test_sections_fill_in_defaults() {
        let (manager, _dir) = manager_with(Some(
            r#"
schema_version = 1

[defaults]
region = "eu-west-2"

[connection]
endpoint = "http://localhost:9000"
force_path_style = true
"#,
        ));

        let config = manager.load().unwrap();
        assert_eq!(config.defaults.region, "eu-west-2");
        assert_eq!(config.defaults.color, "auto");
        assert_eq!(config.connection.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(config.connection.force_path_style);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let (manager, _dir) =
            manager_with(Some("schema_version = 1\n[connection]\nendpoint = \"not a url\"\n"));
        assert!(matches!(manager.load(), Err(Error::InvalidUrl(_))));

        let (manager, _dir) =
            manager_with(Some("schema_version = 1\n[defaults]\ncolor = \"sometimes\"\n"));
        assert!(matches!(manager.load(), Err(Error::Config(_))));

        let (manager, _dir) =
            manager_with(Some("schema_version = 1\n[defaults]\nregion = \" \"\n"));
        assert!(matches!(manager.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let content = format!("schema_version = {}\n", SCHEMA_VERSION + 1);
        let (manager, _dir) = manager_with(Some(&content));
        let err = manager.load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Please upgrade s3interact"));
    }
}
