//! Detector configuration. Defaults reproduce the reference pipeline exactly.

use crate::error::{DetectError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Rolling feature parameters
    pub features: FeaturesConfig,
    /// Isolation forest parameters
    pub forest: ForestConfig,
    /// Explanation summary
    pub explain: ExplainConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Trailing window, counted in observations (not days)
    pub window: usize,
    /// Observations required before rolling mean/std are defined
    pub min_periods: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_trees: usize,
    /// Upper bound on the per-tree sub-sample; the effective size is min(max_samples, N)
    pub max_samples: usize,
    /// Expected anomalous fraction of the batch (0.0–0.5)
    pub contamination: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Number of services reported in the ranked summary
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            window: 7,
            min_periods: 3,
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl DetectorConfig {
    /// Load from JSON file if present; otherwise return default. An existing file that
    /// cannot be used also yields the default, together with the reason, so the caller
    /// can report it once logging is up.
    pub fn load(path: &Path) -> (Self, Option<DetectError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::try_load(path) {
            Ok(c) => (c, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load and validate a JSON config file, surfacing any failure.
    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: DetectorConfig =
            serde_json::from_str(&data).map_err(|e| DetectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.features;
        if f.window == 0 {
            return Err(DetectError::Config("features.window must be positive".into()));
        }
        if f.min_periods == 0 || f.min_periods > f.window {
            return Err(DetectError::Config(format!(
                "features.min_periods must be within 1..={}, got {}",
                f.window, f.min_periods
            )));
        }
        let m = &self.forest;
        if m.n_trees == 0 {
            return Err(DetectError::Config("forest.n_trees must be positive".into()));
        }
        if m.max_samples < 2 {
            return Err(DetectError::Config("forest.max_samples must be at least 2".into()));
        }
        if !(0.0..=0.5).contains(&m.contamination) {
            return Err(DetectError::Config(format!(
                "forest.contamination must be within [0, 0.5], got {}",
                m.contamination
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = DetectorConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.forest.n_trees, 200);
        assert_eq!(c.features.window, 7);
        assert_eq!(c.explain.top_n, 5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: DetectorConfig = serde_json::from_str(r#"{"forest": {"seed": 7}}"#).unwrap();
        assert_eq!(c.forest.seed, 7);
        assert_eq!(c.forest.n_trees, 200);
        assert_eq!(c.features.min_periods, 3);
    }

    #[test]
    fn rejects_out_of_range_contamination() {
        let mut c = DetectorConfig::default();
        c.forest.contamination = 0.7;
        assert!(matches!(c.validate(), Err(DetectError::Config(_))));
    }

    #[test]
    fn load_reports_why_it_fell_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let (c, fallback) = DetectorConfig::load(&path);
        assert!(fallback.is_none());
        assert_eq!(c.forest.seed, 42);

        std::fs::write(&path, r#"{"forest": {"contamination": 0.9, "seed": 5}}"#).unwrap();
        let (c, fallback) = DetectorConfig::load(&path);
        assert_eq!(c.forest.contamination, 0.05);
        assert_eq!(c.forest.seed, 42);
        assert!(matches!(fallback, Some(DetectError::Config(msg)) if msg.contains("contamination")));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(DetectorConfig::load(&path).1, Some(DetectError::Config(_))));
    }

    #[test]
    fn rejects_min_periods_above_window() {
        let mut c = DetectorConfig::default();
        c.features.min_periods = 8;
        assert!(c.validate().is_err());
    }
}
