//! Streaming configuration
//!
//! Supplied by whoever owns the chunk budget. The tracker consumes these
//! values as-is; [`StreamingConfig::validate`] exists for the supplier.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use super::coord::{ChunkMapper, DEFAULT_CHUNK_SIZE};
use super::lod::LodThresholds;

/// Settings for the observer tracker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunk footprint in world units (x, z)
    pub chunk_size: Vec2,
    /// Rings at or inside this radius are requested at high detail
    pub high_threshold: u32,
    /// Rings at or inside this radius are requested at medium detail
    pub medium_threshold: u32,
    /// Rings at or inside this radius are requested at low detail
    pub low_threshold: u32,
    /// Largest ring radius sampled around each observer
    pub unload_radius: u32,
    /// Number of chunks sampled ahead of a moving observer
    pub predictive_distance: u32,
    /// Seconds between recomputations of the requirement list
    pub recompute_interval_secs: f32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: Vec2::splat(DEFAULT_CHUNK_SIZE),
            high_threshold: 2,
            medium_threshold: 4,
            low_threshold: 6,
            unload_radius: 8,
            predictive_distance: 3,
            recompute_interval_secs: 0.1,
        }
    }
}

impl StreamingConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded streaming config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Detail thresholds as a single value
    pub fn thresholds(&self) -> LodThresholds {
        LodThresholds {
            high: self.high_threshold,
            medium: self.medium_threshold,
            low: self.low_threshold,
        }
    }

    /// Coordinate mapper for the configured footprint
    pub fn mapper(&self) -> ChunkMapper {
        ChunkMapper::new(self.chunk_size)
    }

    /// Check the settings for values that would shrink or empty the
    /// requirement list.
    ///
    /// The tracker accepts any config; this is a helper for suppliers.
    pub fn validate(&self) -> Result<()> {
        if !(self.chunk_size.x > 0.0 && self.chunk_size.y > 0.0) || !self.chunk_size.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "chunk_size must be positive and finite, got {:?}",
                self.chunk_size
            )));
        }

        if self.high_threshold > self.medium_threshold || self.medium_threshold > self.low_threshold {
            return Err(Error::InvalidConfig(format!(
                "thresholds must satisfy high <= medium <= low, got {}/{}/{}",
                self.high_threshold, self.medium_threshold, self.low_threshold
            )));
        }

        if self.unload_radius < self.low_threshold {
            return Err(Error::InvalidConfig(format!(
                "unload_radius {} is inside low_threshold {}; outer rings would never be sampled",
                self.unload_radius, self.low_threshold
            )));
        }

        if !self.recompute_interval_secs.is_finite() || self.recompute_interval_secs < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "recompute_interval_secs must be finite and non-negative, got {}",
                self.recompute_interval_secs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = StreamingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds(), LodThresholds { high: 2, medium: 4, low: 6 });
        assert_eq!(config.mapper().chunk_size(), Vec2::splat(32.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = StreamingConfig::from_json_str(r#"{ "predictive_distance": 5 }"#).unwrap();
        assert_eq!(config.predictive_distance, 5);
        assert_eq!(config.high_threshold, 2);
        assert_eq!(config.recompute_interval_secs, 0.1);
    }

    #[test]
    fn test_json_round_trip() {
        let config = StreamingConfig {
            chunk_size: Vec2::new(16.0, 24.0),
            unload_radius: 12,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(StreamingConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        let err = StreamingConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "high_threshold": 1, "medium_threshold": 3, "low_threshold": 5 }}"#).unwrap();

        let config = StreamingConfig::load(file.path()).unwrap();
        assert_eq!(config.thresholds(), LodThresholds { high: 1, medium: 3, low: 5 });
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StreamingConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let unordered = StreamingConfig { high_threshold: 5, ..Default::default() };
        assert!(matches!(unordered.validate(), Err(Error::InvalidConfig(_))));

        let zero_size = StreamingConfig { chunk_size: Vec2::new(0.0, 32.0), ..Default::default() };
        assert!(zero_size.validate().is_err());

        let short_radius = StreamingConfig { unload_radius: 3, ..Default::default() };
        assert!(short_radius.validate().is_err());

        let negative_interval = StreamingConfig { recompute_interval_secs: -1.0, ..Default::default() };
        assert!(negative_interval.validate().is_err());
    }
}
