//! Checker configuration.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! overrides. File loading requires the `config` feature.

use std::fmt;
use std::time::Duration;

/// Tunables for validation, generation and the check history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CheckerConfig {
    /// Number of checks the history keeps (most recent first).
    pub history_capacity: usize,
    /// Attempts the generator makes before giving up on a card.
    pub max_generation_attempts: u32,
    /// Simulated latency of a live check, in milliseconds.
    pub live_check_delay_ms: u64,
    /// Minimum live-check score that passes (out of 120).
    pub live_check_threshold: u32,
    /// Expiry years past the current year still counted as realistic.
    pub realistic_expiry_years: u16,
    /// Generated expiry years are drawn from `current..current + this`.
    pub expiry_horizon_years: u16,
    /// Country code reported for generated cards without a curated BIN.
    pub default_country: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            max_generation_attempts: 10,
            live_check_delay_ms: 1500,
            live_check_threshold: 70,
            realistic_expiry_years: 10,
            expiry_horizon_years: 5,
            default_country: "TR".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Highest score a live check can award.
    pub const MAX_LIVE_SCORE: u32 = 120;

    /// Live-check delay as a `Duration`.
    pub fn live_check_delay(&self) -> Duration {
        Duration::from_millis(self.live_check_delay_ms)
    }

    /// Returns a copy with no live-check delay, for tests and batch runs.
    pub fn without_delay(mut self) -> Self {
        self.live_check_delay_ms = 0;
        self
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_generation_attempts must be at least 1".into(),
            ));
        }
        if self.live_check_threshold > Self::MAX_LIVE_SCORE {
            return Err(ConfigError::Invalid(format!(
                "live_check_threshold {} exceeds the maximum score {}",
                self.live_check_threshold,
                Self::MAX_LIVE_SCORE
            )));
        }
        if self.default_country.trim().is_empty() {
            return Err(ConfigError::Invalid("default_country must not be empty".into()));
        }
        Ok(())
    }

    /// Parses a configuration from JSON text and validates it.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.default_country = config.default_country.trim().to_uppercase();
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file and validates it.
    #[cfg(feature = "config")]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io(std::io::Error),
    /// The file is not valid JSON for this configuration.
    Parse(String),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(s) => write!(f, "Parse error: {}", s),
            Self::Invalid(s) => write!(f, "Invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.live_check_delay(), Duration::from_millis(1500));
        assert_eq!(config.live_check_threshold, 70);
        assert!(config.validate().is_ok());
        assert_eq!(config.without_delay().live_check_delay_ms, 0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = CheckerConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CheckerConfig {
            live_check_threshold: 121,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "config")]
    mod file {
        use super::super::*;
        use std::io::Write;
        use tempfile::NamedTempFile;

        fn write_json(json: &str) -> NamedTempFile {
            let mut f = NamedTempFile::new().unwrap();
            f.write_all(json.as_bytes()).unwrap();
            f
        }

        #[test]
        fn test_partial_file_keeps_defaults() {
            let f = write_json(r#"{ "live_check_delay_ms": 0, "default_country": "us" }"#);
            let config = CheckerConfig::from_json_file(f.path()).unwrap();
            assert_eq!(config.live_check_delay_ms, 0);
            assert_eq!(config.default_country, "US");
            assert_eq!(config.history_capacity, 10);
        }

        #[test]
        fn test_missing_file() {
            let result = CheckerConfig::from_json_file("/nonexistent/cc_checker.json");
            assert!(matches!(result, Err(ConfigError::Io(_))));
        }

        #[test]
        fn test_invalid_json() {
            let f = write_json("{ not json");
            assert!(matches!(
                CheckerConfig::from_json_file(f.path()),
                Err(ConfigError::Parse(_))
            ));
        }

        #[test]
        fn test_out_of_range_value() {
            let result = CheckerConfig::from_json_str(r#"{ "history_capacity": 0 }"#);
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }
    }
}
