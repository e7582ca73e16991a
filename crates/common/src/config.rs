//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RepsenseError, RepsenseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Squat detector tuning.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the outlier fence around the top-range buffer is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutlierFence {
    /// Fence at `q1 - k*iqr` and `q3 + k*iqr` using buffer quartiles.
    ///
    /// A buffer filled with near-identical standing gaps has an iqr near
    /// zero, so deeper gaps are evicted as outliers and the estimate can
    /// stay pinned at the standing value.
    Interquartile,
    /// Fence at `min - k*range` and `max + k*range`.
    ///
    /// Every buffered sample lies inside this fence, so the minimum is
    /// always the sample that gets replaced.
    #[default]
    FullRange,
}

/// Tuning constants for smoothing, the adaptive threshold, and counting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Exponential smoothing divisor. `1.0` disables smoothing.
    pub smooth_factor: f64,

    /// Threshold used whenever the adaptive estimate is unusable.
    pub default_threshold: f64,

    /// Subtracted from the top-range average to form the threshold.
    pub margin: f64,

    /// Estimates below `default_threshold - fallback_below` fall back.
    pub fallback_below: f64,

    /// Estimates above `default_threshold + fallback_above` fall back.
    pub fallback_above: f64,

    /// Maximum number of hip-knee gaps retained by the estimator.
    pub buffer_capacity: usize,

    /// Fence width multiplier for outlier detection.
    pub tukey_multiplier: f64,

    /// Decimal places kept when storing an observed gap.
    pub sample_decimals: u32,

    /// Fence derivation used for outlier detection.
    pub outlier_fence: OutlierFence,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "repsense=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            smooth_factor: 100.0,
            default_threshold: 0.15,
            margin: 0.015,
            fallback_below: 0.05,
            fallback_above: 0.1,
            buffer_capacity: 10,
            tukey_multiplier: 1.5,
            sample_decimals: 4,
            outlier_fence: OutlierFence::FullRange,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DetectorConfig {
    /// Inclusive range an adaptive threshold must fall in to be used.
    pub fn fallback_range(&self) -> (f64, f64) {
        (
            self.default_threshold - self.fallback_below,
            self.default_threshold + self.fallback_above,
        )
    }

    /// Check that every parameter is usable by the pipeline.
    pub fn validate(&self) -> RepsenseResult<()> {
        if !self.smooth_factor.is_finite() || self.smooth_factor < 1.0 {
            return Err(RepsenseError::config(format!(
                "smooth_factor must be a finite value >= 1, got {}",
                self.smooth_factor
            )));
        }
        if !self.default_threshold.is_finite() {
            return Err(RepsenseError::config("default_threshold must be finite"));
        }
        for (name, value) in [
            ("margin", self.margin),
            ("fallback_below", self.fallback_below),
            ("fallback_above", self.fallback_above),
            ("tukey_multiplier", self.tukey_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RepsenseError::config(format!(
                    "{name} must be a finite non-negative value, got {value}"
                )));
            }
        }
        if self.buffer_capacity == 0 {
            return Err(RepsenseError::config("buffer_capacity must be at least 1"));
        }
        if self.sample_decimals > 12 {
            return Err(RepsenseError::config(format!(
                "sample_decimals must be <= 12, got {}",
                self.sample_decimals
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path, propagating any failure.
    pub fn load_from(path: &Path) -> RepsenseResult<Self> {
        if !path.exists() {
            return Err(RepsenseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.detector.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> RepsenseResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> RepsenseResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("repsense").join("config.json")
}
