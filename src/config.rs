//! Decider configuration
//!
//! Two policy knobs: how wide the acceptance band is (in standard
//! deviations) and how many observations an operation needs before the band
//! is trusted. Both default to the classic tail-sampling values of 2σ and a
//! warm-up of two observations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default band half-width in standard deviations
pub const DEFAULT_BAND_WIDTH: f64 = 2.0;

/// Default number of observations before an operation leaves warm-up
pub const DEFAULT_WARMUP_COUNT: u64 = 2;

/// Configuration for a [`TailDecider`](crate::decider::TailDecider)
///
/// # Example
/// ```
/// use tail_sampler::config::DeciderConfig;
///
/// let config = DeciderConfig::from_toml_str("band_width = 3.0").unwrap();
/// assert_eq!(config.band_width, 3.0);
/// assert_eq!(config.warmup_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeciderConfig {
    /// Band half-width `k`: observations outside `mean ± k·σ` are retained
    ///
    /// Default: 2.0
    pub band_width: f64,

    /// Observations are retained unconditionally while an operation's count
    /// is below this value
    ///
    /// Must be at least 2: with fewer, the first observation would be tested
    /// against a zero-width band centered on itself and dropped.
    ///
    /// Default: 2
    pub warmup_count: u64,
}

impl Default for DeciderConfig {
    fn default() -> Self {
        Self {
            band_width: DEFAULT_BAND_WIDTH,
            warmup_count: DEFAULT_WARMUP_COUNT,
        }
    }
}

impl DeciderConfig {
    /// Strict configuration: only far outliers are kept, after a longer warm-up
    pub fn strict() -> Self {
        Self {
            band_width: 3.0,
            warmup_count: 10,
        }
    }

    /// Permissive configuration: a narrower band keeps more spans
    pub fn permissive() -> Self {
        Self {
            band_width: 1.5,
            warmup_count: DEFAULT_WARMUP_COUNT,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.band_width.is_finite() || self.band_width < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "band_width must be finite and non-negative, got {}",
                self.band_width
            )));
        }

        if self.warmup_count < 2 {
            return Err(Error::InvalidConfig(format!(
                "warmup_count must be >= 2, got {}",
                self.warmup_count
            )));
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeciderConfig::default();
        assert_eq!(config.band_width, 2.0);
        assert_eq!(config.warmup_count, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        let strict = DeciderConfig::strict();
        assert_eq!(strict.band_width, 3.0);
        assert_eq!(strict.warmup_count, 10);
        assert!(strict.validate().is_ok());

        let permissive = DeciderConfig::permissive();
        assert_eq!(permissive.band_width, 1.5);
        assert!(permissive.validate().is_ok());
    }

    #[test]
    fn test_invalid_band_width() {
        for band_width in [-1.0, f64::NAN, f64::INFINITY] {
            let config = DeciderConfig {
                band_width,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_zero_band_width_allowed() {
        let config = DeciderConfig {
            band_width: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_warmup_count() {
        for warmup_count in [0, 1] {
            let config = DeciderConfig {
                warmup_count,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("warmup_count"));
        }
    }

    #[test]
    fn test_from_toml_full() {
        let config = DeciderConfig::from_toml_str("band_width = 2.5\nwarmup_count = 5\n").unwrap();
        assert_eq!(config.band_width, 2.5);
        assert_eq!(config.warmup_count, 5);
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = DeciderConfig::from_toml_str("").unwrap();
        assert_eq!(config, DeciderConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_field() {
        let result = DeciderConfig::from_toml_str("sample_rate = 0.5");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_from_toml_validates() {
        let result = DeciderConfig::from_toml_str("warmup_count = 1");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decider.toml");
        std::fs::write(&path, "band_width = 4.0\n").unwrap();

        let config = DeciderConfig::from_file(&path).unwrap();
        assert_eq!(config.band_width, 4.0);

        let missing = DeciderConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
