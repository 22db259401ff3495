//! Per-frame measurement pipeline.
//!
//! A [`MeasurementSession`] owns every piece of mutable state for one user:
//! calibration, the smoothing history, the stability snapshot and the hold
//! timer. Frames are processed one at a time through `&mut self`.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use suitme_body_model::landmark::LandmarkSet;
use suitme_body_model::measurement::{Measurements, Unit};
use suitme_body_model::result::{CapturedMeasurement, FrameResult, FrameStatus};
use suitme_body_model::size::SizeCategories;
use suitme_common::clock::{ns_to_secs, secs_to_ns, Clock, SessionClock};
use suitme_common::config::MeasurementConfig;
use suitme_common::error::{MeasureError, MeasureResult};

use crate::calibration::{CalibrationRequest, CalibrationState, CalibrationStore};
use crate::extract::MeasurementExtractor;
use crate::history::MeasurementHistory;
use crate::provider::LandmarkProvider;
use crate::sizing::SizeClassifier;
use crate::stability::StabilityDetector;

/// Where the session stands after the latest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No calibration yet; frames are rejected.
    Uncalibrated,
    /// Calibrated, no frame processed since.
    Calibrated,
    /// Waiting for a complete, confident pose.
    Detecting,
    /// Pose found but moving.
    TrackingUnstable,
    /// Pose held still, hold timer running.
    TrackingStable,
    /// Pose held long enough; measurements captured.
    Finalized,
}

/// Measurement session for one user in front of one camera.
pub struct MeasurementSession<C: Clock = SessionClock> {
    config: MeasurementConfig,
    provider: Box<dyn LandmarkProvider>,
    clock: C,
    calibration: CalibrationStore,
    extractor: MeasurementExtractor,
    history: MeasurementHistory,
    stability: StabilityDetector,
    classifier: SizeClassifier,
    stable_since_ns: Option<u64>,
    phase: SessionPhase,
    latest: Option<CapturedMeasurement>,
}

impl MeasurementSession<SessionClock> {
    /// Create a session timed by the monotonic clock, starting now.
    pub fn new(
        provider: Box<dyn LandmarkProvider>,
        config: MeasurementConfig,
    ) -> MeasureResult<Self> {
        Self::with_clock(provider, SessionClock::start(), config)
    }
}

impl<C: Clock> MeasurementSession<C> {
    /// Create a session driven by the given clock.
    pub fn with_clock(
        provider: Box<dyn LandmarkProvider>,
        clock: C,
        config: MeasurementConfig,
    ) -> MeasureResult<Self> {
        config.validate()?;

        tracing::debug!(provider = %provider.name(), "Measurement session created");

        Ok(Self {
            calibration: CalibrationStore::new(&config),
            extractor: MeasurementExtractor::from_config(&config),
            history: MeasurementHistory::new(config.history_length),
            stability: StabilityDetector::from_config(&config),
            classifier: SizeClassifier::default(),
            provider,
            clock,
            config,
            stable_since_ns: None,
            phase: SessionPhase::Uncalibrated,
            latest: None,
        })
    }

    /// Replace the size charts used for captures.
    pub fn with_classifier(mut self, classifier: SizeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Calibrate (or recalibrate) the session.
    ///
    /// A successful call starts over: smoothing history, stability snapshot,
    /// hold timer and latest capture are all cleared. A rejected request
    /// changes nothing.
    pub fn calibrate(&mut self, request: CalibrationRequest) -> MeasureResult<CalibrationState> {
        let state = self.calibration.initialize(request)?;
        self.clear_tracking();
        self.latest = None;
        self.phase = SessionPhase::Calibrated;
        Ok(state)
    }

    /// Clear smoothing and stability state, keeping calibration and the
    /// latest capture.
    pub fn reset(&mut self) {
        self.clear_tracking();
        self.phase = if self.calibration.is_calibrated() {
            SessionPhase::Calibrated
        } else {
            SessionPhase::Uncalibrated
        };
        tracing::debug!("Measurement session reset");
    }

    /// Run one frame through detection, extraction, smoothing and the
    /// stability gate.
    ///
    /// Per-frame conditions (nobody in view, landmarks missing) come back as
    /// a status in `Ok`. Errors are returned for an uncalibrated session or a
    /// failing provider; neither affects later frames.
    pub fn process_frame(&mut self, image: &RgbImage) -> MeasureResult<FrameResult> {
        if !self.calibration.is_calibrated() {
            return Err(MeasureError::NotCalibrated);
        }

        let now_ns = self.clock.elapsed_ns();

        let landmarks = match self.provider.detect(image) {
            Ok(Some(landmarks)) => landmarks,
            Ok(None) => {
                self.lose_pose();
                tracing::debug!(timestamp_ns = now_ns, "No pose detected");
                return Ok(FrameResult::status_only(
                    FrameStatus::NoPoseDetected,
                    "No pose detected",
                    now_ns,
                ));
            }
            Err(err) => {
                self.lose_pose();
                tracing::warn!(provider = %self.provider.name(), error = %err, "Landmark detection failed");
                return Err(err);
            }
        };

        self.track(&landmarks, now_ns)
    }

    fn track(&mut self, landmarks: &LandmarkSet, now_ns: u64) -> MeasureResult<FrameResult> {
        let sample = match self.extractor.extract(landmarks) {
            Ok(sample) => sample,
            Err(MeasureError::IncompleteLandmarks { missing }) => {
                self.lose_pose();
                tracing::debug!(missing = ?missing, "Incomplete landmarks");
                return Ok(FrameResult::status_only(
                    FrameStatus::AdjustPosition,
                    format!(
                        "Not visible clearly: {}. Please adjust position.",
                        missing.join(", ")
                    ),
                    now_ns,
                ));
            }
            Err(err) => return Err(err),
        };

        let degenerate = match self.calibration.refine(sample.shoulder_width) {
            Ok(_) => false,
            Err(err @ MeasureError::DegenerateGeometry { .. }) => {
                tracing::warn!(error = %err, "Degenerate frame kept out of history");
                true
            }
            Err(err) => return Err(err),
        };
        let scale_factor = self
            .calibration
            .scale_factor()
            .ok_or(MeasureError::NotCalibrated)?;

        if !degenerate {
            self.history.push_sample(&sample);
        }
        let stable = self.stability.update(landmarks);
        let movement = self.stability.last_movement();

        let held_ns = if stable {
            let since = *self.stable_since_ns.get_or_insert(now_ns);
            Some(now_ns.saturating_sub(since))
        } else {
            self.stable_since_ns = None;
            None
        };

        // None until a non-degenerate frame has been pushed
        let measurements = self
            .history
            .smoothed()
            .map(|smoothed| smoothed.to_measurements(Some(scale_factor)));

        let mut result = FrameResult {
            has_pose: true,
            status: FrameStatus::Measuring,
            message: String::new(),
            measurements,
            unit: Unit::Cm,
            scale_factor: Some(scale_factor),
            size_categories: None,
            finalized: false,
            movement,
            hold_remaining_secs: None,
            timestamp_ns: now_ns,
        };

        let hold_ns = secs_to_ns(self.config.stable_pose_secs);
        match (held_ns, measurements) {
            (Some(held), Some(measurements)) if held >= hold_ns => {
                let size_categories = self.classifier.classify(&measurements);
                self.capture(measurements, size_categories, scale_factor, now_ns);

                result.status = FrameStatus::Captured;
                result.message = "Measurements captured".to_string();
                result.size_categories = Some(size_categories);
                result.finalized = true;
                self.phase = SessionPhase::Finalized;
            }
            (Some(held), _) => {
                let remaining = ns_to_secs(hold_ns.saturating_sub(held));
                result.message = format!("Pose stable, hold still for {remaining:.1}s");
                result.hold_remaining_secs = Some(remaining);
                self.phase = SessionPhase::TrackingStable;
            }
            (None, _) => {
                result.message = match movement {
                    Some(movement) => format!(
                        "Movement detected: {movement:.1} (threshold: {})",
                        self.config.movement_threshold
                    ),
                    None => "Hold still for measurement".to_string(),
                };
                self.phase = SessionPhase::TrackingUnstable;
            }
        }

        tracing::debug!(
            status = %result.status,
            scale_factor,
            movement = ?movement,
            "Frame processed"
        );

        Ok(result)
    }

    fn capture(
        &mut self,
        measurements: Measurements,
        size_categories: SizeCategories,
        scale_factor: f64,
        timestamp_ns: u64,
    ) {
        if self.phase != SessionPhase::Finalized {
            tracing::info!(
                shoulder_width_cm = measurements.shoulder_width,
                torso_length_cm = measurements.torso_length,
                leg_length_cm = measurements.leg_length(),
                overall = %size_categories.overall,
                "Measurements captured"
            );
        }

        self.latest = Some(CapturedMeasurement {
            measurements,
            size_categories,
            scale_factor,
            timestamp_ns,
            captured_at: self.clock.wall_now(),
        });
    }

    /// The frame carried no usable pose: the hold has to start over.
    fn lose_pose(&mut self) {
        self.stable_since_ns = None;
        self.phase = SessionPhase::Detecting;
    }

    fn clear_tracking(&mut self) {
        self.history.clear();
        self.stability.reset();
        self.stable_since_ns = None;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn calibration(&self) -> Option<&CalibrationState> {
        self.calibration.state()
    }

    /// Most recent finalized capture, if any.
    pub fn latest(&self) -> Option<&CapturedMeasurement> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ReplayProvider;
    use suitme_body_model::landmark::{BodyLandmark, Landmark};
    use suitme_body_model::measurement::Dimension;
    use suitme_body_model::size::SizeLabel;
    use suitme_common::clock::ManualClock;

    fn standing(shift_x: f64) -> LandmarkSet {
        [
            (BodyLandmark::Nose, (320.0, 40.0)),
            (BodyLandmark::LeftShoulder, (220.0, 100.0)),
            (BodyLandmark::RightShoulder, (420.0, 100.0)),
            (BodyLandmark::LeftElbow, (200.0, 220.0)),
            (BodyLandmark::RightElbow, (440.0, 220.0)),
            (BodyLandmark::LeftWrist, (190.0, 330.0)),
            (BodyLandmark::RightWrist, (450.0, 330.0)),
            (BodyLandmark::LeftHip, (260.0, 340.0)),
            (BodyLandmark::RightHip, (380.0, 340.0)),
            (BodyLandmark::LeftKnee, (260.0, 535.0)),
            (BodyLandmark::RightKnee, (380.0, 535.0)),
            (BodyLandmark::LeftAnkle, (260.0, 730.0)),
            (BodyLandmark::RightAnkle, (380.0, 730.0)),
        ]
        .into_iter()
        .map(|(name, (x, y))| (name, Landmark::new(x + shift_x, y, 0.95)))
        .collect()
    }

    fn session(frames: Vec<Option<LandmarkSet>>) -> (MeasurementSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = MeasurementSession::with_clock(
            Box::new(ReplayProvider::new(frames)),
            clock.clone(),
            MeasurementConfig::default(),
        )
        .unwrap();
        (session, clock)
    }

    fn frame() -> RgbImage {
        RgbImage::new(640, 800)
    }

    #[test]
    fn test_frames_rejected_before_calibration() {
        let (mut session, _) = session(vec![Some(standing(0.0))]);
        let err = session.process_frame(&frame()).unwrap_err();
        assert!(matches!(err, MeasureError::NotCalibrated));
        assert_eq!(session.phase(), SessionPhase::Uncalibrated);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MeasurementConfig {
            history_length: 0,
            ..MeasurementConfig::default()
        };
        let result = MeasurementSession::with_clock(
            Box::new(ReplayProvider::default()),
            ManualClock::new(),
            config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_still_subject_is_captured_after_hold() {
        let (mut session, clock) = session(vec![Some(standing(0.0)); 60]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        let first = session.process_frame(&frame()).unwrap();
        assert_eq!(first.status, FrameStatus::Measuring);
        assert_eq!(session.phase(), SessionPhase::TrackingUnstable);

        clock.advance_secs(0.1);
        let second = session.process_frame(&frame()).unwrap();
        assert_eq!(session.phase(), SessionPhase::TrackingStable);
        assert!((second.hold_remaining_secs.unwrap() - 3.0).abs() < 1e-9);

        clock.advance_secs(2.9);
        let holding = session.process_frame(&frame()).unwrap();
        assert!(!holding.finalized);

        clock.advance_secs(0.1);
        let captured = session.process_frame(&frame()).unwrap();
        assert!(captured.finalized);
        assert_eq!(captured.status, FrameStatus::Captured);
        assert_eq!(session.phase(), SessionPhase::Finalized);

        let m = captured.measurements.unwrap();
        assert_eq!(m.unit, Unit::Cm);
        assert!((m.shoulder_width - 40.0).abs() < 1e-6);
        assert!((m.torso_length - 48.0).abs() < 1e-6);
        assert!((m.leg_length() - 78.0).abs() < 1e-6);

        let sizes = captured.size_categories.unwrap();
        assert_eq!(sizes.torso, SizeLabel::M);
        assert_eq!(sizes.legs, SizeLabel::M);
        assert_eq!(sizes.overall, SizeLabel::M);

        let latest = session.latest().unwrap();
        assert_eq!(latest.size_categories, sizes);
        assert_eq!(latest.timestamp_ns, captured.timestamp_ns);
    }

    #[test]
    fn test_movement_restarts_hold() {
        let frames = vec![
            Some(standing(0.0)),
            Some(standing(0.0)),
            Some(standing(30.0)),
            Some(standing(30.0)),
        ];
        let (mut session, clock) = session(frames);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        session.process_frame(&frame()).unwrap();
        clock.advance_secs(2.0);
        session.process_frame(&frame()).unwrap();

        clock.advance_secs(2.0);
        let moved = session.process_frame(&frame()).unwrap();
        assert_eq!(session.phase(), SessionPhase::TrackingUnstable);
        assert!(moved.message.starts_with("Movement detected: 360.0"));

        clock.advance_secs(2.0);
        let still = session.process_frame(&frame()).unwrap();
        assert!(!still.finalized);
        assert!((still.hold_remaining_secs.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_pose_resets_timer() {
        let frames = vec![
            Some(standing(0.0)),
            Some(standing(0.0)),
            None,
            Some(standing(0.0)),
        ];
        let (mut session, clock) = session(frames);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        session.process_frame(&frame()).unwrap();
        session.process_frame(&frame()).unwrap();

        clock.advance_secs(5.0);
        let lost = session.process_frame(&frame()).unwrap();
        assert!(!lost.has_pose);
        assert_eq!(lost.status, FrameStatus::NoPoseDetected);
        assert_eq!(session.phase(), SessionPhase::Detecting);

        clock.advance_secs(5.0);
        let back = session.process_frame(&frame()).unwrap();
        // still against the pre-gap snapshot, but the hold starts over
        assert!(!back.finalized);
        assert_eq!(session.phase(), SessionPhase::TrackingStable);
    }

    #[test]
    fn test_incomplete_landmarks_ask_to_adjust() {
        let mut partial = standing(0.0);
        partial.insert(BodyLandmark::RightAnkle, Landmark::new(380.0, 730.0, 0.1));
        let (mut session, _) = session(vec![Some(partial)]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        let result = session.process_frame(&frame()).unwrap();
        assert!(result.has_pose);
        assert_eq!(result.status, FrameStatus::AdjustPosition);
        assert!(result.message.contains("right_ankle"));
        assert!(result.measurements.is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_provider_error_propagates_for_one_frame() {
        let (mut session, _) = session(vec![Some(standing(0.0))]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        assert!(session.process_frame(&frame()).is_ok());
        let err = session.process_frame(&frame()).unwrap_err();
        assert!(matches!(err, MeasureError::Detection { .. }));
        assert_eq!(session.phase(), SessionPhase::Detecting);
        assert!(!session.history().is_empty());
    }

    #[test]
    fn test_degenerate_shoulders_keep_scale() {
        let mut collapsed = standing(0.0);
        collapsed.insert(BodyLandmark::RightShoulder, Landmark::new(220.0, 100.0, 0.95));
        let (mut session, _) = session(vec![Some(collapsed)]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        let result = session.process_frame(&frame()).unwrap();
        assert_eq!(result.scale_factor, Some(0.2));
        assert_eq!(result.status, FrameStatus::Measuring);
        assert!(result.measurements.is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_degenerate_frame_does_not_skew_average() {
        let mut collapsed = standing(0.0);
        collapsed.insert(BodyLandmark::RightShoulder, Landmark::new(220.0, 100.0, 0.95));
        let mut frames = vec![Some(standing(0.0)); 9];
        frames.push(Some(collapsed));
        let (mut session, _) = session(frames);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        for _ in 0..9 {
            session.process_frame(&frame()).unwrap();
        }
        let result = session.process_frame(&frame()).unwrap();

        let m = result.measurements.unwrap();
        assert!((m.shoulder_width - 40.0).abs() < 1e-6);
        assert_eq!(session.history().len(Dimension::ShoulderWidth), 9);
        assert_eq!(session.history().len(Dimension::TorsoLength), 9);
    }

    #[test]
    fn test_head_height_dropped_when_nose_hidden() {
        let mut hidden = standing(0.0);
        hidden.insert(BodyLandmark::Nose, Landmark::new(320.0, 40.0, 0.1));
        let frames = vec![Some(standing(0.0)), Some(hidden.clone()), Some(hidden)];
        let (mut session, _) = session(frames);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();

        let seen = session.process_frame(&frame()).unwrap();
        let m = seen.measurements.unwrap();
        assert!((m.head_height.unwrap() - 12.0).abs() < 1e-6);
        assert!(m.estimated_height().is_some());

        for _ in 0..2 {
            let m = session.process_frame(&frame()).unwrap().measurements.unwrap();
            assert_eq!(m.head_height, None);
            assert_eq!(m.estimated_height(), None);
        }
    }

    #[test]
    fn test_recalibration_clears_state() {
        let (mut session, clock) = session(vec![Some(standing(0.0)); 10]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();
        session.process_frame(&frame()).unwrap();
        session.process_frame(&frame()).unwrap();
        clock.advance_secs(3.0);
        assert!(session.process_frame(&frame()).unwrap().finalized);

        assert!(session.calibrate(CalibrationRequest::new(-1.0)).is_err());
        assert!(session.latest().is_some());

        session
            .calibrate(CalibrationRequest::new(44.0).with_user_height(182.0))
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Calibrated);
        assert!(session.latest().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.calibration().unwrap().user_height_cm, Some(182.0));
    }

    #[test]
    fn test_reset_keeps_calibration() {
        let (mut session, _) = session(vec![Some(standing(0.0))]);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();
        session.process_frame(&frame()).unwrap();

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Calibrated);
        assert!(session.history().is_empty());
        assert!(session.calibration().is_some());
    }

    #[test]
    fn test_custom_classifier_used_for_capture() {
        use crate::sizing::{SizeChart, SizeRange};

        // everything above 30 cm is XL
        let chart = SizeChart::new(vec![
            SizeRange { label: SizeLabel::XS, min: 0.0, max: Some(30.0) },
            SizeRange { label: SizeLabel::XL, min: 30.0, max: None },
        ]);
        let classifier = SizeClassifier {
            shoulders: chart.clone(),
            torso: chart.clone(),
            legs: chart,
            ..SizeClassifier::default()
        };

        let (session, clock) = session(vec![Some(standing(0.0)); 3]);
        let mut session = session.with_classifier(classifier);
        session.calibrate(CalibrationRequest::new(40.0)).unwrap();
        session.process_frame(&frame()).unwrap();
        session.process_frame(&frame()).unwrap();
        clock.advance_secs(3.0);

        let captured = session.process_frame(&frame()).unwrap();
        assert_eq!(captured.size_categories.unwrap().overall, SizeLabel::XL);
    }
}
