//! Recorded landmark streams.
//!
//! A recording is JSONL: one [`RecordedFrame`] per line, `#` lines are
//! comments. It captures exactly what a landmark detector reported so a
//! session can be replayed without the camera or the model.

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkSet;

/// One frame of a recorded landmark stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Nanoseconds since recording start.
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Detector output, `null` when no person was found.
    pub landmarks: Option<LandmarkSet>,
}

/// Parse a JSONL recording, skipping blank and `#` comment lines.
pub fn parse_recording(content: &str) -> Result<Vec<RecordedFrame>, serde_json::Error> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize frames back to JSONL.
pub fn write_recording(frames: &[RecordedFrame]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for frame in frames {
        out.push_str(&serde_json::to_string(frame)?);
        out.push('\n');
    }
    Ok(out)
}
