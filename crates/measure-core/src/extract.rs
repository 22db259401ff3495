//! Pixel distances between landmark pairs.

use suitme_body_model::landmark::{BodyLandmark, Landmark, LandmarkSet};
use suitme_body_model::measurement::MeasurementSample;
use suitme_common::config::MeasurementConfig;
use suitme_common::error::{MeasureError, MeasureResult};

/// Landmarks a frame must carry to be measured.
pub const REQUIRED_LANDMARKS: [BodyLandmark; 6] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
    BodyLandmark::LeftAnkle,
    BodyLandmark::RightAnkle,
];

/// Computes a [`MeasurementSample`] from one frame's landmarks.
///
/// Torso length runs from the shoulder midpoint to the hip midpoint, which
/// keeps it independent of which side faces the camera.
#[derive(Debug, Clone)]
pub struct MeasurementExtractor {
    confidence_floor: f64,
}

impl MeasurementExtractor {
    pub fn new(confidence_floor: f64) -> Self {
        Self { confidence_floor }
    }

    pub fn from_config(config: &MeasurementConfig) -> Self {
        Self::new(config.confidence_floor)
    }

    pub fn confidence_floor(&self) -> f64 {
        self.confidence_floor
    }

    /// Measure every dimension, or name the landmarks that held it back.
    pub fn extract(&self, landmarks: &LandmarkSet) -> MeasureResult<MeasurementSample> {
        let missing: Vec<&str> = REQUIRED_LANDMARKS
            .iter()
            .filter(|name| self.usable(landmarks, **name).is_none())
            .map(|name| name.name())
            .collect();
        if !missing.is_empty() {
            return Err(MeasureError::incomplete_landmarks(missing));
        }

        let point = |name: BodyLandmark| {
            self.usable(landmarks, name)
                .copied()
                .ok_or_else(|| MeasureError::incomplete_landmarks([name.name()]))
        };
        let left_shoulder = point(BodyLandmark::LeftShoulder)?;
        let right_shoulder = point(BodyLandmark::RightShoulder)?;
        let left_hip = point(BodyLandmark::LeftHip)?;
        let right_hip = point(BodyLandmark::RightHip)?;
        let left_ankle = point(BodyLandmark::LeftAnkle)?;
        let right_ankle = point(BodyLandmark::RightAnkle)?;

        let shoulder_mid = left_shoulder.midpoint(&right_shoulder);
        let hip_mid = left_hip.midpoint(&right_hip);

        let head_height = self
            .usable(landmarks, BodyLandmark::Nose)
            .map(|nose| (shoulder_mid.y - nose.y).abs());

        Ok(MeasurementSample {
            shoulder_width: left_shoulder.distance_to(&right_shoulder),
            torso_length: shoulder_mid.distance_to(&hip_mid),
            hip_width: left_hip.distance_to(&right_hip),
            left_leg_length: left_hip.distance_to(&left_ankle),
            right_leg_length: right_hip.distance_to(&right_ankle),
            head_height,
        })
    }

    /// A landmark that is present, confident enough and has real coordinates.
    fn usable<'a>(&self, landmarks: &'a LandmarkSet, name: BodyLandmark) -> Option<&'a Landmark> {
        landmarks
            .visible(name, self.confidence_floor)
            .filter(|lm| lm.x.is_finite() && lm.y.is_finite())
    }
}

impl Default for MeasurementExtractor {
    fn default() -> Self {
        Self::from_config(&MeasurementConfig::default())
    }
}
