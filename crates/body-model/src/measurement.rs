//! Body measurement records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tracked body dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ShoulderWidth,
    TorsoLength,
    HipWidth,
    LeftLegLength,
    RightLegLength,
    /// Nose to shoulder line. Only tracked when the nose is visible.
    HeadHeight,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::ShoulderWidth,
        Self::TorsoLength,
        Self::HipWidth,
        Self::LeftLegLength,
        Self::RightLegLength,
        Self::HeadHeight,
    ];

    /// Dimensions every valid sample carries.
    pub const REQUIRED: [Dimension; 5] = [
        Self::ShoulderWidth,
        Self::TorsoLength,
        Self::HipWidth,
        Self::LeftLegLength,
        Self::RightLegLength,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ShoulderWidth => "shoulder_width",
            Self::TorsoLength => "torso_length",
            Self::HipWidth => "hip_width",
            Self::LeftLegLength => "left_leg_length",
            Self::RightLegLength => "right_leg_length",
            Self::HeadHeight => "head_height",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit a measurement value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Raw pixel distance; no scale factor applied.
    #[default]
    Px,
    /// Centimeters, after applying the calibrated scale factor.
    Cm,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Cm => "cm",
        }
    }
}

/// Raw pixel distances extracted from a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub shoulder_width: f64,
    pub torso_length: f64,
    pub hip_width: f64,
    pub left_leg_length: f64,
    pub right_leg_length: f64,
    pub head_height: Option<f64>,
}

impl MeasurementSample {
    /// Value of one dimension, `None` for an untracked head height.
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::ShoulderWidth => Some(self.shoulder_width),
            Dimension::TorsoLength => Some(self.torso_length),
            Dimension::HipWidth => Some(self.hip_width),
            Dimension::LeftLegLength => Some(self.left_leg_length),
            Dimension::RightLegLength => Some(self.right_leg_length),
            Dimension::HeadHeight => self.head_height,
        }
    }

    /// All present `(dimension, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(|dim| self.get(dim).map(|value| (dim, value)))
    }

    /// Convert to reported measurements.
    ///
    /// With a scale factor the values become centimeters; without one they
    /// stay in pixels.
    pub fn to_measurements(&self, scale_factor: Option<f64>) -> Measurements {
        let (factor, unit) = match scale_factor {
            Some(factor) => (factor, Unit::Cm),
            None => (1.0, Unit::Px),
        };
        Measurements {
            shoulder_width: self.shoulder_width * factor,
            torso_length: self.torso_length * factor,
            hip_width: self.hip_width * factor,
            left_leg_length: self.left_leg_length * factor,
            right_leg_length: self.right_leg_length * factor,
            head_height: self.head_height.map(|v| v * factor),
            unit,
        }
    }
}

/// Smoothed measurements as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub shoulder_width: f64,
    pub torso_length: f64,
    pub hip_width: f64,
    pub left_leg_length: f64,
    pub right_leg_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_height: Option<f64>,
    pub unit: Unit,
}

impl Measurements {
    /// Centimeter measurements with no head height, handy for charts and tests.
    pub fn cm(shoulder_width: f64, torso_length: f64, leg_length: f64) -> Self {
        Self {
            shoulder_width,
            torso_length,
            hip_width: 0.0,
            left_leg_length: leg_length,
            right_leg_length: leg_length,
            head_height: None,
            unit: Unit::Cm,
        }
    }

    /// Mean of both legs.
    pub fn leg_length(&self) -> f64 {
        (self.left_leg_length + self.right_leg_length) / 2.0
    }

    /// Standing height estimate: head + torso + legs, when the head was tracked.
    pub fn estimated_height(&self) -> Option<f64> {
        self.head_height
            .map(|head| head + self.torso_length + self.leg_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MeasurementSample {
        MeasurementSample {
            shoulder_width: 200.0,
            torso_length: 250.0,
            hip_width: 150.0,
            left_leg_length: 400.0,
            right_leg_length: 410.0,
            head_height: None,
        }
    }

    #[test]
    fn test_iter_skips_untracked_head() {
        let dims: Vec<_> = sample().iter().map(|(d, _)| d).collect();
        assert_eq!(dims, Dimension::REQUIRED.to_vec());

        let with_head = MeasurementSample {
            head_height: Some(120.0),
            ..sample()
        };
        assert_eq!(with_head.iter().count(), 6);
    }

    #[test]
    fn test_scaling_switches_unit() {
        let px = sample().to_measurements(None);
        assert_eq!(px.unit, Unit::Px);
        assert_eq!(px.shoulder_width, 200.0);

        let cm = sample().to_measurements(Some(0.2));
        assert_eq!(cm.unit, Unit::Cm);
        assert!((cm.shoulder_width - 40.0).abs() < 1e-9);
        assert!((cm.leg_length() - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimated_height_needs_head() {
        let cm = sample().to_measurements(Some(0.2));
        assert_eq!(cm.estimated_height(), None);

        let with_head = MeasurementSample {
            head_height: Some(100.0),
            ..sample()
        }
        .to_measurements(Some(0.2));
        // 20 head + 50 torso + 81 legs
        assert!((with_head.estimated_height().unwrap() - 151.0).abs() < 1e-9);
    }

    #[test]
    fn test_measurements_serialize_camel_case() {
        let json = serde_json::to_value(Measurements::cm(40.0, 47.0, 78.0)).unwrap();
        assert_eq!(json["shoulderWidth"], 40.0);
        assert_eq!(json["unit"], "cm");
        assert!(json.get("headHeight").is_none());
    }
}
