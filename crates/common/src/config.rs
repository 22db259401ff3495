//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MeasureError, MeasureResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Measurement pipeline tuning.
    pub measurement: MeasurementConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tuning constants for a measurement session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Frames kept per dimension for the moving average.
    pub history_length: usize,

    /// Minimum visibility for a required landmark to count.
    pub confidence_floor: f64,

    /// Summed tracked-landmark displacement (px) below which a frame is still.
    pub movement_threshold: f64,

    /// How long the subject must hold still before a capture (seconds).
    pub stable_pose_secs: f64,

    /// Largest scale-factor change (cm/px) a single frame may propose.
    pub jitter_threshold: f64,

    /// Weight given to an accepted scale-factor candidate.
    pub blend_weight: f64,

    /// Seed scale factor per meter of camera distance (cm/px per m).
    pub scale_per_meter: f64,

    /// Camera distance assumed when calibration does not give one (m).
    pub default_camera_distance_m: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "suitme=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            history_length: 10,
            confidence_floor: 0.7,
            movement_threshold: 100.0,
            stable_pose_secs: 3.0,
            jitter_threshold: 0.05,
            blend_weight: 0.1,
            scale_per_meter: 0.1,
            default_camera_distance_m: 2.0,
        }
    }
}

impl MeasurementConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> MeasureResult<()> {
        if self.history_length == 0 {
            return Err(MeasureError::config("history_length must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(MeasureError::config(format!(
                "confidence_floor must be within [0, 1], got {}",
                self.confidence_floor
            )));
        }
        if !(self.blend_weight > 0.0 && self.blend_weight <= 1.0) {
            return Err(MeasureError::config(format!(
                "blend_weight must be within (0, 1], got {}",
                self.blend_weight
            )));
        }
        for (name, value) in [
            ("movement_threshold", self.movement_threshold),
            ("jitter_threshold", self.jitter_threshold),
            ("scale_per_meter", self.scale_per_meter),
            ("default_camera_distance_m", self.default_camera_distance_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MeasureError::config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.stable_pose_secs.is_finite() && self.stable_pose_secs >= 0.0) {
            return Err(MeasureError::config(format!(
                "stable_pose_secs must be non-negative, got {}",
                self.stable_pose_secs
            )));
        }
        Ok(())
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

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Load and validate config from a specific file.
    pub fn load_from(path: &Path) -> MeasureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> MeasureResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.measurement.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> MeasureResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> MeasureResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
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
    base.join("suitme").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MeasurementConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_length, 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            AppConfig::from_json(r#"{ "measurement": { "stable_pose_secs": 2.0 } }"#).unwrap();
        assert_eq!(config.measurement.stable_pose_secs, 2.0);
        assert_eq!(config.measurement.movement_threshold, 100.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_history_rejected() {
        let err = AppConfig::from_json(r#"{ "measurement": { "history_length": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, MeasureError::Config { .. }));
    }

    #[test]
    fn test_out_of_range_blend_weight_rejected() {
        let config = MeasurementConfig {
            blend_weight: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("suitme-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.measurement.movement_threshold = 80.0;
        config.logging.json = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.measurement, config.measurement);
        assert!(loaded.logging.json);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load_from(Path::new("/nonexistent/suitme/config.json")).unwrap_err();
        assert!(matches!(err, MeasureError::Io(_)));
    }
}
