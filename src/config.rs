use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kmeans::ConvergenceMetric;

const DEFAULT_MAX_ITER: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Parameters of a clustering run.
///
/// Every key may be omitted from a file; a missing `k` reads as 0 and fails
/// [`KMeansConfig::validate`] unless something else supplies it.
///
/// ```yaml
/// k: 8
/// max_iter: 300
/// seed: 42
/// epsilon: 0.0001
/// metric: max_shift
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    #[serde(default)]
    pub k: usize,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub epsilon: f64,
    #[serde(default)]
    pub metric: ConvergenceMetric,
}

fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

impl KMeansConfig {
    /// Configuration for `k` clusters with every other field at its default.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
            epsilon: 0.0,
            metric: ConvergenceMetric::default(),
        }
    }

    /// Parses a YAML document without validating it, for callers that layer
    /// further overrides on top before calling [`KMeansConfig::validate`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed YAML.
    pub fn parse_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses a YAML document and validates it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_yaml(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML configuration file without validating it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] for malformed YAML.
    pub fn read_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_yaml(&raw)
    }

    /// Reads and validates a YAML configuration file.
    ///
    /// # Errors
    /// As [`KMeansConfig::read_path`], plus [`ConfigError::Invalid`] for
    /// out-of-range values.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values a run cannot start without.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::Invalid {
                name: "k",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(ConfigError::Invalid {
                name: "max_iter",
                reason: "must be greater than 0".to_string(),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                name: "epsilon",
                reason: format!("must be a finite non-negative number, got {}", self.epsilon),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn yaml_fills_defaults() {
        let config = KMeansConfig::from_yaml_str("k: 4\n").expect("minimal config");
        assert_eq!(config, KMeansConfig::new(4));
        assert_eq!(config.max_iter, 100);
        assert_eq!(config.metric, ConvergenceMetric::GlobalCentroid);
    }

    #[test]
    fn yaml_reads_every_field() {
        let config = KMeansConfig::from_yaml_str(
            "k: 3\nmax_iter: 7\nseed: 42\nepsilon: 0.5\nmetric: max_shift\n",
        )
        .expect("full config");
        assert_eq!(config.k, 3);
        assert_eq!(config.max_iter, 7);
        assert_eq!(config.seed, Some(42));
        assert!((config.epsilon - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.metric, ConvergenceMetric::MaxShift);
    }

    #[rstest]
    #[case("k: 0\n", "k")]
    #[case("k: 2\nmax_iter: 0\n", "max_iter")]
    #[case("k: 2\nepsilon: -1.0\n", "epsilon")]
    fn invalid_values_name_the_field(#[case] raw: &str, #[case] field: &str) {
        match KMeansConfig::from_yaml_str(raw) {
            Err(ConfigError::Invalid { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid {field}, got {other:?}"),
        }
    }

    #[test]
    fn missing_k_fails_validation_but_parses() {
        assert!(matches!(
            KMeansConfig::from_yaml_str("max_iter: 3\n"),
            Err(ConfigError::Invalid { name: "k", .. })
        ));

        let partial = KMeansConfig::parse_yaml("seed: 7\nepsilon: 0.1\n").expect("well-formed");
        assert_eq!(partial.k, 0);
        assert_eq!(partial.seed, Some(7));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            KMeansConfig::parse_yaml("k: [unclosed\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn read_path_defers_validation() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "k: 2\nmax_iter: 0").expect("write config");

        let config = KMeansConfig::read_path(file.path()).expect("well-formed file");
        assert_eq!(config.max_iter, 0);
        assert!(KMeansConfig::from_path(file.path()).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "k: 5\nseed: 9").expect("write config");

        let config = KMeansConfig::from_path(file.path()).expect("readable config");
        assert_eq!(config.k, 5);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = KMeansConfig::from_path(Path::new("/nonexistent/kmeans.yaml"))
            .expect_err("no such file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
