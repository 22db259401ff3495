//! SuitMe Measurement Core
//!
//! Turns a stream of pose landmarks into body measurements and a garment
//! size recommendation:
//! - **Calibration:** Pixel-to-centimeter scale seeded from camera distance and
//!   refined against the user's known shoulder width
//! - **Extraction:** Pixel distances between landmark pairs
//! - **Smoothing:** Bounded per-dimension moving average
//! - **Stability:** Frame-to-frame displacement check gating the capture
//! - **Sizing:** Half-open size charts and a weighted overall size
//! - **Session:** The per-frame pipeline tying it all together
//!
//! Pose detection itself is behind the [`LandmarkProvider`] trait. Everything
//! else is pure computation owned by one [`MeasurementSession`].

pub mod calibration;
pub mod extract;
pub mod history;
pub mod provider;
pub mod session;
pub mod sizing;
pub mod stability;

pub use calibration::{CalibrationRequest, CalibrationState, CalibrationStore};
pub use extract::MeasurementExtractor;
pub use history::MeasurementHistory;
pub use provider::{LandmarkProvider, ReplayProvider};
pub use session::{MeasurementSession, SessionPhase};
pub use sizing::{SizeChart, SizeClassifier};
pub use stability::StabilityDetector;
