//! Pose landmark types.
//!
//! Landmarks follow the 33-point BlazePose topology that common 2D pose
//! estimators emit. A [`LandmarkSet`] holds whichever of them the detector
//! reported for one frame.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named anatomical landmark, ordered by its detector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const COUNT: usize = 33;

    /// Every landmark in detector order.
    pub const ALL: [BodyLandmark; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// snake_case name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single detected landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate (grows downwards).
    pub y: f64,
    /// Detector visibility/confidence in [0.0, 1.0].
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// Build from detector output normalized to `[0, 1]` of the frame size.
    pub fn from_normalized(nx: f64, ny: f64, visibility: f64, width: u32, height: u32) -> Self {
        Self {
            x: nx * width as f64,
            y: ny * height as f64,
            visibility,
        }
    }

    /// Whether the detector's confidence reaches `floor`.
    pub fn is_visible(&self, floor: f64) -> bool {
        self.visibility >= floor
    }

    /// Euclidean distance in pixel space.
    pub fn distance_to(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between two landmarks; visibility is the weaker of the two.
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            visibility: self.visibility.min(other.visibility),
        }
    }
}

/// Landmarks detected in one frame, keyed and ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: BTreeMap<BodyLandmark, Landmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a detector's normalized output, one entry per index.
    ///
    /// Indices beyond the known topology are ignored.
    pub fn from_normalized<I>(points: I, width: u32, height: u32) -> Self
    where
        I: IntoIterator<Item = (usize, f64, f64, f64)>,
    {
        points
            .into_iter()
            .filter_map(|(index, nx, ny, visibility)| {
                BodyLandmark::from_index(index).map(|name| {
                    (name, Landmark::from_normalized(nx, ny, visibility, width, height))
                })
            })
            .collect()
    }

    pub fn insert(&mut self, name: BodyLandmark, landmark: Landmark) -> Option<Landmark> {
        self.points.insert(name, landmark)
    }

    pub fn get(&self, name: BodyLandmark) -> Option<&Landmark> {
        self.points.get(&name)
    }

    /// The landmark, only if present and at or above the confidence floor.
    pub fn visible(&self, name: BodyLandmark, floor: f64) -> Option<&Landmark> {
        self.get(name).filter(|lm| lm.is_visible(floor))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyLandmark, &Landmark)> {
        self.points.iter().map(|(name, lm)| (*name, lm))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean visibility across reported landmarks, 0 when empty.
    pub fn average_visibility(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.values().map(|lm| lm.visibility).sum::<f64>() / self.points.len() as f64
    }
}

impl FromIterator<(BodyLandmark, Landmark)> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = (BodyLandmark, Landmark)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
