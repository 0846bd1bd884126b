//! Configuration types for the near-duplicate detection engine.
//!
//! Parameters cover shingle window size, locality-sensitive banding, and the
//! default similarity threshold used by clustering queries.

use serde::{Deserialize, Serialize};

use crate::core::errors::{NeardupError, Result};
use crate::engine::signature::SIGNATURE_SIZE;

/// Engine configuration for shingling, banding, and query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shingle window size in characters
    pub window_size: usize,

    /// Number of LSH bands over the signature
    pub num_bands: usize,

    /// Default Jaccard similarity threshold for clustering queries
    pub similarity_threshold: f64,

    /// Restrict candidate pairs through the bucket index. When disabled the
    /// engine falls back to the quadratic linear scan.
    pub use_bucket_index: bool,
}

/// Default implementation for [`EngineConfig`].
impl Default for EngineConfig {
    /// Returns the default engine configuration.
    fn default() -> Self {
        Self {
            window_size: 10,
            num_bands: 4, // 5 rows per band over the 20-element signature
            similarity_threshold: 0.5,
            use_bucket_index: true,
        }
    }
}

/// Validation and utility methods for [`EngineConfig`].
impl EngineConfig {
    /// Validate the engine configuration.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(NeardupError::config_field(
                "window_size must be greater than 0",
                "window_size",
            ));
        }

        if self.num_bands == 0 {
            return Err(NeardupError::config_field(
                "num_bands must be greater than 0",
                "num_bands",
            ));
        }

        if SIGNATURE_SIZE % self.num_bands != 0 {
            return Err(NeardupError::config_field(
                format!("num_bands must divide the signature size ({SIGNATURE_SIZE})"),
                "num_bands",
            ));
        }

        validate_unit_range(self.similarity_threshold, "similarity_threshold")?;

        Ok(())
    }

    /// Returns the number of signature elements per band (rows per band in
    /// LSH parlance). Higher values reduce false positives but may miss some
    /// similar pairs.
    pub fn rows_per_band(&self) -> usize {
        SIGNATURE_SIZE / self.num_bands
    }

    /// Set the shingle window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the number of LSH bands.
    pub fn with_num_bands(mut self, num_bands: usize) -> Self {
        self.num_bands = num_bands;
        self
    }

    /// Set the default similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Enable or disable the locality-sensitive bucket index.
    pub fn with_bucket_index(mut self, enabled: bool) -> Self {
        self.use_bucket_index = enabled;
        self
    }
}

/// Validate that a value falls within the unit interval [0, 1].
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NeardupError::config_field(
            format!("{field} must be in [0.0, 1.0], got {value}"),
            field,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows_per_band(), 5);
    }

    #[test]
    fn test_band_divisibility() {
        let config = EngineConfig::default().with_num_bands(3);
        assert!(config.validate().is_err());

        let config = EngineConfig::default().with_num_bands(5);
        assert!(config.validate().is_ok());
        assert_eq!(config.rows_per_band(), 4);
    }

    #[test]
    fn test_threshold_range() {
        let config = EngineConfig::default().with_similarity_threshold(1.5);
        assert!(config.validate().is_err());

        let config = EngineConfig::default().with_similarity_threshold(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = EngineConfig::default().with_window_size(0);
        assert!(config.validate().is_err());
    }
}
