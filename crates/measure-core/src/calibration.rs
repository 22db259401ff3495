//! Pixel-to-centimeter calibration.
//!
//! The scale factor is seeded from the camera distance and then pulled
//! towards `known_shoulder_width_cm / measured_shoulder_width_px` on every
//! frame. Candidates further than the jitter threshold from the current
//! value are dropped as misdetections; accepted ones are blended in with a
//! small weight so displayed measurements do not flicker.

use serde::{Deserialize, Serialize};
use suitme_common::config::MeasurementConfig;
use suitme_common::error::{MeasureError, MeasureResult};

/// Inputs for starting a calibrated session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRequest {
    /// The user's real shoulder width (cm).
    pub known_shoulder_width_cm: f64,
    /// Distance between subject and camera (m). Defaults from config.
    pub camera_distance_m: Option<f64>,
    /// The user's real height (cm), kept for reporting.
    pub user_height_cm: Option<f64>,
}

impl CalibrationRequest {
    pub fn new(known_shoulder_width_cm: f64) -> Self {
        Self {
            known_shoulder_width_cm,
            camera_distance_m: None,
            user_height_cm: None,
        }
    }

    pub fn with_camera_distance(mut self, meters: f64) -> Self {
        self.camera_distance_m = Some(meters);
        self
    }

    pub fn with_user_height(mut self, cm: f64) -> Self {
        self.user_height_cm = Some(cm);
        self
    }
}

/// Calibration of one measurement session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    pub known_shoulder_width_cm: f64,
    pub camera_distance_m: f64,
    pub user_height_cm: Option<f64>,
    /// Centimeters per pixel. Always positive.
    pub scale_factor: f64,
    pub calibrated: bool,
}

/// Holds and refines the session's scale factor.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    jitter_threshold: f64,
    blend_weight: f64,
    scale_per_meter: f64,
    default_camera_distance_m: f64,
    state: Option<CalibrationState>,
}

impl CalibrationStore {
    pub fn new(config: &MeasurementConfig) -> Self {
        Self {
            jitter_threshold: config.jitter_threshold,
            blend_weight: config.blend_weight,
            scale_per_meter: config.scale_per_meter,
            default_camera_distance_m: config.default_camera_distance_m,
            state: None,
        }
    }

    /// Validate the request and seed a fresh scale factor.
    ///
    /// On error the previous calibration, if any, is left untouched.
    pub fn initialize(&mut self, request: CalibrationRequest) -> MeasureResult<CalibrationState> {
        let width = request.known_shoulder_width_cm;
        if !(width.is_finite() && width > 0.0) {
            return Err(MeasureError::invalid_input(format!(
                "known shoulder width must be positive, got {width}"
            )));
        }

        let camera_distance_m = request
            .camera_distance_m
            .unwrap_or(self.default_camera_distance_m);
        if !(camera_distance_m.is_finite() && camera_distance_m > 0.0) {
            return Err(MeasureError::invalid_input(format!(
                "camera distance must be positive, got {camera_distance_m}"
            )));
        }

        if let Some(height) = request.user_height_cm {
            if !(height.is_finite() && height > 0.0) {
                return Err(MeasureError::invalid_input(format!(
                    "user height must be positive, got {height}"
                )));
            }
        }

        let state = CalibrationState {
            known_shoulder_width_cm: width,
            camera_distance_m,
            user_height_cm: request.user_height_cm,
            scale_factor: camera_distance_m * self.scale_per_meter,
            calibrated: true,
        };

        tracing::info!(
            shoulder_width_cm = width,
            camera_distance_m,
            scale_factor = state.scale_factor,
            "Calibration initialized"
        );

        self.state = Some(state);
        Ok(state)
    }

    /// Pull the scale factor towards the one implied by this frame.
    ///
    /// Returns the scale factor after the update, which equals the previous
    /// one when the candidate was rejected as jitter.
    pub fn refine(&mut self, measured_shoulder_width_px: f64) -> MeasureResult<f64> {
        let state = self.state.as_mut().ok_or(MeasureError::NotCalibrated)?;

        if !(measured_shoulder_width_px.is_finite() && measured_shoulder_width_px > 0.0) {
            return Err(MeasureError::degenerate_geometry(format!(
                "shoulder width of {measured_shoulder_width_px} px cannot set a scale"
            )));
        }

        let candidate = state.known_shoulder_width_cm / measured_shoulder_width_px;
        let delta = (candidate - state.scale_factor).abs();

        if delta < self.jitter_threshold {
            state.scale_factor =
                state.scale_factor * (1.0 - self.blend_weight) + candidate * self.blend_weight;
        } else {
            tracing::debug!(
                candidate,
                current = state.scale_factor,
                "Scale candidate rejected as jitter"
            );
        }

        Ok(state.scale_factor)
    }

    pub fn state(&self) -> Option<&CalibrationState> {
        self.state.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.is_some_and(|s| s.calibrated)
    }

    pub fn scale_factor(&self) -> Option<f64> {
        self.state.map(|s| s.scale_factor)
    }
}
