//! SuitMe Body Model
//!
//! Defines the data contracts exchanged with the measurement core:
//! - **Landmarks:** Named anatomical points with pixel position and visibility
//! - **Measurements:** Fixed-shape per-dimension distance records
//! - **Sizes:** Ordered garment size labels and per-dimension categories
//! - **Results:** The structured per-frame record returned to callers
//! - **Recordings:** JSONL landmark streams for offline replay
//!
//! Landmark coordinates are in pixels of the analyzed frame, origin top-left.

pub mod landmark;
pub mod measurement;
pub mod recording;
pub mod result;
pub mod size;

pub use landmark::*;
pub use measurement::*;
pub use recording::*;
pub use result::*;
pub use size::*;
