//! Configuration for profmatch
//!
//! Scoring constants for the similarity curve and server settings. Loaded
//! from TOML (or JSON) files; every section falls back to its defaults.
//!
//! ```toml
//! [scoring]
//! max_value = 7.0
//! steepness = 10.0
//! midpoint = 0.5
//! star_scale = 5.0
//!
//! [server]
//! addr = "127.0.0.1:8000"
//! database_path = "/var/lib/profmatch/profmatch.db"
//! install_catalog = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Similarity curve parameters
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// HTTP server and database settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Parameters of the weighted-distance logistic curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Upper bound of ratings and weights; sets the worst-case distance
    pub max_value: f64,
    /// Logistic steepness
    pub steepness: f64,
    /// Distance ratio at which similarity is exactly 0.5
    pub midpoint: f64,
    /// Similarity-to-stars multiplier
    pub star_scale: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_value: 7.0,
            steepness: 10.0,
            midpoint: 0.5,
            star_scale: 5.0,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Populate the feature catalog on startup
    pub install_catalog: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            database_path: default_database_path(),
            install_catalog: true,
        }
    }
}

/// `<data dir>/profmatch/profmatch.db`, or the working directory when the
/// platform has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("profmatch")
        .join("profmatch.db")
}

impl MatchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a config file. `.json` files are parsed as JSON,
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;

        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::MissingField("server.addr".to_string()));
        }

        Ok(())
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_value", self.max_value),
            ("steepness", self.steepness),
            ("star_scale", self.star_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange(format!(
                    "scoring.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(self.midpoint > 0.0 && self.midpoint < 1.0) {
            return Err(ConfigError::OutOfRange(format!(
                "scoring.midpoint must be between 0.0 and 1.0, got {}",
                self.midpoint
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// File could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// File could not be read
    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.steepness, 10.0);
        assert_eq!(config.scoring.midpoint, 0.5);
        assert_eq!(config.scoring.star_scale, 5.0);
        assert!(config.server.database_path.ends_with("profmatch.db"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MatchConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = MatchConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.scoring, config.scoring);
        assert_eq!(parsed.server.addr, config.server.addr);
    }

    #[test]
    fn test_json_serialization() {
        let config = MatchConfig::default();
        let json = config.to_json().unwrap();
        let parsed = MatchConfig::from_json(&json).unwrap();
        assert_eq!(parsed.scoring, config.scoring);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = MatchConfig::from_toml("[scoring]\nsteepness = 6.0\n").unwrap();
        assert_eq!(config.scoring.steepness, 6.0);
        assert_eq!(config.scoring.max_value, 7.0);
        assert_eq!(config.server.addr, "127.0.0.1:8000");
    }

    #[test]
    fn test_out_of_range() {
        let mut config = MatchConfig::default();
        config.scoring.steepness = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = MatchConfig::default();
        config.scoring.midpoint = 1.5;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.server.addr = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profmatch.toml");
        std::fs::write(&path, "[server]\naddr = \"0.0.0.0:9000\"\n").unwrap();

        let config = MatchConfig::load(&path).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:9000");

        let missing = MatchConfig::load(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
