use std::path::{Path, PathBuf};
use std::time::Duration;

use accelog_core::TextEncoding;
use accelog_dsp::FilterSpec;
use serde::{Deserialize, Serialize};

/// Settings file contents. Every field is optional in the file; missing ones
/// take the defaults below and command-line flags override both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collect: CollectConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    pub duration_secs: f64,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// `taps`, `sample_rate_hz` and `cutoff_hz` sit directly in `[filter]`.
    #[serde(flatten)]
    pub spec: FilterSpec,
    pub output: PathBuf,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            duration_secs: accelog_core::DEFAULT_DURATION.as_secs_f64(),
            encoding: TextEncoding::default().to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            spec: FilterSpec::default(),
            output: PathBuf::from("filter_coefficients.json"),
        }
    }
}

impl CollectConfig {
    pub fn duration(&self) -> Result<Duration, ConfigError> {
        capture_window(self.duration_secs)
            .map_err(|e| ConfigError::Validation(format!("collect.duration_secs {e}")))
    }

    pub fn text_encoding(&self) -> Result<TextEncoding, ConfigError> {
        self.encoding
            .parse()
            .map_err(|e: accelog_core::UnknownEncoding| ConfigError::Validation(e.to_string()))
    }
}

impl AppConfig {
    /// `<config dir>/accelog/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("accelog").join("config.toml"))
    }

    /// Loads `explicit` if given (it must exist), otherwise the default
    /// location if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collect.duration()?;
        self.collect.text_encoding()?;
        self.filter
            .spec
            .validate()
            .map_err(|e| ConfigError::Validation(format!("filter: {e}")))?;
        Ok(())
    }
}

/// Converts a capture window given in seconds, rejecting values that are not
/// positive or do not fit a [`Duration`].
pub fn capture_window(secs: f64) -> Result<Duration, String> {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err(format!("must be a positive number of seconds, got {secs}")),
        Err(e) => Err(format!("is out of range ({secs}): {e}")),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collect.duration().unwrap(), Duration::from_secs(10));
        assert_eq!(config.collect.text_encoding().unwrap(), TextEncoding::Utf8);
        assert_eq!(config.filter.spec, FilterSpec::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[collect]\nduration_secs = 2.5\n\n[filter]\ntaps = 31\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.collect.duration().unwrap(), Duration::from_millis(2500));
        assert_eq!(config.collect.encoding, "UTF-8");
        assert_eq!(config.filter.spec.taps, 31);
        assert_eq!(config.filter.spec.cutoff_hz, 20.0);
        assert_eq!(config.filter.output, PathBuf::from("filter_coefficients.json"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[collect]\nduration_secs = 0.0\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "[collect]\nduration_secs = 1e30\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "[collect]\nencoding = \"EBCDIC\"\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "[filter]\ncutoff_hz = 500.0\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_capture_window_bounds() {
        assert_eq!(capture_window(0.25), Ok(Duration::from_millis(250)));
        for bad in [0.0, -1.0, 1e-12, f64::NAN, f64::INFINITY, 1e30] {
            assert!(capture_window(bad).is_err(), "{bad} accepted");
        }

        let mut config = AppConfig::default();
        config.collect.duration_secs = 1e30;
        assert!(matches!(config.collect.duration(), Err(ConfigError::Validation(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_and_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[collect\n").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Parse { .. })));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(AppConfig::load(Some(&missing)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
