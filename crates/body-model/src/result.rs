//! Per-frame results returned by a measurement session.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::measurement::{Measurements, Unit};
use crate::size::SizeCategories;

/// Where a frame left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameStatus {
    #[serde(rename = "not calibrated")]
    NotCalibrated,
    #[serde(rename = "no pose detected")]
    NoPoseDetected,
    #[serde(rename = "adjust position")]
    AdjustPosition,
    #[serde(rename = "measuring")]
    Measuring,
    #[serde(rename = "captured")]
    Captured,
}

impl FrameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotCalibrated => "not calibrated",
            Self::NoPoseDetected => "no pose detected",
            Self::AdjustPosition => "adjust position",
            Self::Measuring => "measuring",
            Self::Captured => "captured",
        }
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result for one processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    /// Whether the detector found a person.
    pub has_pose: bool,
    pub status: FrameStatus,
    /// Human-readable guidance for the user.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurements>,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    /// Present only on a finalized capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_categories: Option<SizeCategories>,
    pub finalized: bool,
    /// Summed tracked-landmark displacement since the previous frame (px).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<f64>,
    /// Seconds the subject still has to hold still, while a hold is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_remaining_secs: Option<f64>,
    /// Session-relative time of the frame.
    pub timestamp_ns: u64,
}

impl FrameResult {
    /// A result with no measurements attached.
    pub fn status_only(status: FrameStatus, message: impl Into<String>, timestamp_ns: u64) -> Self {
        Self {
            has_pose: matches!(
                status,
                FrameStatus::AdjustPosition | FrameStatus::Measuring | FrameStatus::Captured
            ),
            status,
            message: message.into(),
            measurements: None,
            unit: Unit::Px,
            scale_factor: None,
            size_categories: None,
            finalized: false,
            movement: None,
            hold_remaining_secs: None,
            timestamp_ns,
        }
    }

    /// Result for a frame submitted before calibration.
    ///
    /// Sessions return `Err(NotCalibrated)` for such frames; front ends that
    /// answer every frame with a result (an HTTP handler, a preview overlay)
    /// send this in its place.
    pub fn not_calibrated(timestamp_ns: u64) -> Self {
        Self::status_only(
            FrameStatus::NotCalibrated,
            "System not calibrated. Please calibrate first.",
            timestamp_ns,
        )
    }
}

/// The most recent finalized capture of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedMeasurement {
    pub measurements: Measurements,
    pub size_categories: SizeCategories,
    pub scale_factor: f64,
    pub timestamp_ns: u64,
    pub captured_at: DateTime<Utc>,
}
