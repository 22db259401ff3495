//! Pose stability detection.
//!
//! Compares each frame's torso and limb landmarks with the previous frame.
//! Face, hand and foot-tip points are left out: they move independently of
//! the stance and would flag a still subject as moving.

use suitme_body_model::landmark::{BodyLandmark, Landmark, LandmarkSet};
use suitme_common::config::MeasurementConfig;

const TRACKED_COUNT: usize = 12;

/// Landmarks whose displacement decides stability.
pub const TRACKED_LANDMARKS: [BodyLandmark; TRACKED_COUNT] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::RightElbow,
    BodyLandmark::LeftWrist,
    BodyLandmark::RightWrist,
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
    BodyLandmark::LeftKnee,
    BodyLandmark::RightKnee,
    BodyLandmark::LeftAnkle,
    BodyLandmark::RightAnkle,
];

type Snapshot = [Option<Landmark>; TRACKED_COUNT];

/// Frame-to-frame movement check.
#[derive(Debug, Clone)]
pub struct StabilityDetector {
    movement_threshold: f64,
    previous: Option<Snapshot>,
    last_movement: Option<f64>,
}

impl StabilityDetector {
    pub fn new(movement_threshold: f64) -> Self {
        Self {
            movement_threshold,
            previous: None,
            last_movement: None,
        }
    }

    pub fn from_config(config: &MeasurementConfig) -> Self {
        Self::new(config.movement_threshold)
    }

    pub fn movement_threshold(&self) -> f64 {
        self.movement_threshold
    }

    /// Compare with the previous frame and remember this one.
    ///
    /// The first frame after construction or [`reset`](Self::reset) is never
    /// stable. A frame missing any tracked landmark, or following one that
    /// was, is not stable either.
    pub fn update(&mut self, landmarks: &LandmarkSet) -> bool {
        let current: Snapshot = TRACKED_LANDMARKS.map(|name| landmarks.get(name).copied());

        let movement = self
            .previous
            .as_ref()
            .and_then(|previous| total_displacement(previous, &current));
        self.previous = Some(current);
        self.last_movement = movement;

        match movement {
            Some(movement) => {
                let stable = movement < self.movement_threshold;
                tracing::trace!(movement, stable, "Pose stability");
                stable
            }
            None => false,
        }
    }

    /// Displacement measured by the latest [`update`](Self::update), if any.
    pub fn last_movement(&self) -> Option<f64> {
        self.last_movement
    }

    /// Forget the stored snapshot.
    pub fn reset(&mut self) {
        self.previous = None;
        self.last_movement = None;
    }
}

/// Sum of per-landmark distances, `None` if either snapshot has a gap.
fn total_displacement(previous: &Snapshot, current: &Snapshot) -> Option<f64> {
    previous
        .iter()
        .zip(current.iter())
        .map(|(prev, curr)| Some(prev.as_ref()?.distance_to(curr.as_ref()?)))
        .sum()
}
