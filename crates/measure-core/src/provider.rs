//! Landmark detection seam.
//!
//! Pose estimation runs outside this crate (an ONNX model, a camera SDK, a
//! remote service). Implementations of [`LandmarkProvider`] adapt whichever
//! detector is in use; [`ReplayProvider`] plays back recorded landmarks.

use std::collections::VecDeque;

use image::RgbImage;
use suitme_body_model::landmark::LandmarkSet;
use suitme_body_model::recording::RecordedFrame;
use suitme_common::error::{MeasureError, MeasureResult};

/// Trait for pose landmark detectors.
pub trait LandmarkProvider: Send {
    /// Detect one person in the image. Returns `None` if nobody is found.
    ///
    /// Landmark coordinates are in pixels of `image`.
    fn detect(&mut self, image: &RgbImage) -> MeasureResult<Option<LandmarkSet>>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Plays back a fixed sequence of detections, one per call.
#[derive(Debug, Default)]
pub struct ReplayProvider {
    frames: VecDeque<Option<LandmarkSet>>,
}

impl ReplayProvider {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Option<LandmarkSet>>,
    {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Replay the landmarks of a parsed recording.
    pub fn from_recording(frames: &[RecordedFrame]) -> Self {
        Self::new(frames.iter().map(|frame| frame.landmarks.clone()))
    }

    /// Queue another detection result.
    pub fn push(&mut self, landmarks: Option<LandmarkSet>) {
        self.frames.push_back(landmarks);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ReplayProvider {
    fn detect(&mut self, _image: &RgbImage) -> MeasureResult<Option<LandmarkSet>> {
        self.frames
            .pop_front()
            .ok_or_else(|| MeasureError::detection("replay exhausted"))
    }

    fn name(&self) -> &str {
        "replay"
    }
}
