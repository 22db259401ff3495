//! Garment size classification.
//!
//! Each chart is an ordered list of half-open `[min, max)` centimeter
//! intervals. The overall size blends the per-dimension size codes with
//! fixed weights; shoulder fit dominates for outerwear.

use serde::{Deserialize, Serialize};
use suitme_body_model::measurement::{Measurements, Unit};
use suitme_body_model::size::{SizeCategories, SizeLabel};

/// One chart row: `min <= value < max`, `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub label: SizeLabel,
    pub min: f64,
    pub max: Option<f64>,
}

impl SizeRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }
}

/// Ordered size table for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeChart {
    ranges: Vec<SizeRange>,
}

impl SizeChart {
    pub fn new(ranges: Vec<SizeRange>) -> Self {
        Self { ranges }
    }

    /// Build from consecutive upper bounds, XS first. XS starts at 0 and the
    /// size after the last bound is unbounded.
    fn from_bounds(bounds: [f64; 6]) -> Self {
        let mut min = 0.0;
        let mut ranges = Vec::with_capacity(SizeLabel::SIZED.len());
        let upper = bounds.map(Some).into_iter().chain([None]);
        for (label, max) in SizeLabel::SIZED.into_iter().zip(upper) {
            ranges.push(SizeRange { label, min, max });
            if let Some(max) = max {
                min = max;
            }
        }
        Self { ranges }
    }

    /// Shoulder width chart (cm).
    pub fn shoulders() -> Self {
        Self::from_bounds([38.0, 40.0, 42.0, 44.0, 46.0, 48.0])
    }

    /// Torso length chart (cm).
    pub fn torso() -> Self {
        Self::from_bounds([40.0, 45.0, 50.0, 55.0, 60.0, 65.0])
    }

    /// Leg length chart (cm).
    pub fn legs() -> Self {
        Self::from_bounds([70.0, 75.0, 80.0, 85.0, 90.0, 95.0])
    }

    pub fn ranges(&self) -> &[SizeRange] {
        &self.ranges
    }

    /// First interval containing the value, `Unknown` if none does.
    pub fn lookup(&self, value: f64) -> SizeLabel {
        self.ranges
            .iter()
            .find(|range| range.contains(value))
            .map_or(SizeLabel::Unknown, |range| range.label)
    }
}

/// Relative importance of each dimension in the overall size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeWeights {
    pub shoulders: f64,
    pub torso: f64,
    pub legs: f64,
}

impl Default for SizeWeights {
    fn default() -> Self {
        Self {
            shoulders: 0.5,
            torso: 0.3,
            legs: 0.2,
        }
    }
}

/// Maps centimeter measurements to size categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClassifier {
    pub shoulders: SizeChart,
    pub torso: SizeChart,
    pub legs: SizeChart,
    pub weights: SizeWeights,
}

impl Default for SizeClassifier {
    fn default() -> Self {
        Self {
            shoulders: SizeChart::shoulders(),
            torso: SizeChart::torso(),
            legs: SizeChart::legs(),
            weights: SizeWeights::default(),
        }
    }
}

impl SizeClassifier {
    /// Size each charted dimension and derive the overall size.
    ///
    /// Charts are in centimeters; pixel measurements classify as `Unknown`.
    pub fn classify(&self, measurements: &Measurements) -> SizeCategories {
        if measurements.unit != Unit::Cm {
            tracing::debug!("Skipping size classification of uncalibrated measurements");
            return SizeCategories {
                shoulders: SizeLabel::Unknown,
                torso: SizeLabel::Unknown,
                legs: SizeLabel::Unknown,
                overall: SizeLabel::Unknown,
            };
        }

        let shoulders = self.shoulders.lookup(measurements.shoulder_width);
        let torso = self.torso.lookup(measurements.torso_length);
        let legs = self.legs.lookup(measurements.leg_length());

        SizeCategories {
            shoulders,
            torso,
            legs,
            overall: self.overall(shoulders, torso, legs),
        }
    }

    /// Weighted blend of size codes.
    ///
    /// `Unknown` dimensions drop out and the remaining weights are
    /// renormalized; with nothing known the overall size is `Unknown`.
    pub fn overall(&self, shoulders: SizeLabel, torso: SizeLabel, legs: SizeLabel) -> SizeLabel {
        let (weighted, total_weight) = [
            (shoulders, self.weights.shoulders),
            (torso, self.weights.torso),
            (legs, self.weights.legs),
        ]
        .into_iter()
        .filter_map(|(label, weight)| label.code().map(|code| (code as f64, weight)))
        .fold((0.0, 0.0), |(sum, total), (code, weight)| {
            (sum + code * weight, total + weight)
        });

        if total_weight <= 0.0 {
            return SizeLabel::Unknown;
        }

        let code = (weighted / total_weight).round().clamp(1.0, 7.0);
        SizeLabel::from_code(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SizeLabel::*;

    #[test]
    fn test_boundary_resolves_to_upper_interval() {
        let chart = SizeChart::shoulders();
        assert_eq!(chart.lookup(39.999), S);
        assert_eq!(chart.lookup(40.0), M);
        assert_eq!(chart.lookup(38.0), S);
    }

    #[test]
    fn test_chart_ends_are_open() {
        let chart = SizeChart::legs();
        assert_eq!(chart.lookup(0.0), XS);
        assert_eq!(chart.lookup(250.0), XXXL);
        assert_eq!(chart.lookup(-1.0), Unknown);
        assert_eq!(chart.lookup(f64::NAN), Unknown);
    }

    #[test]
    fn test_default_charts_cover_every_size_once() {
        for chart in [SizeChart::shoulders(), SizeChart::torso(), SizeChart::legs()] {
            let labels: Vec<_> = chart.ranges().iter().map(|r| r.label).collect();
            assert_eq!(labels, SizeLabel::SIZED.to_vec());
            for pair in chart.ranges().windows(2) {
                assert_eq!(pair[0].max, Some(pair[1].min));
            }
            assert_eq!(chart.ranges().last().unwrap().max, None);
        }
    }

    #[test]
    fn test_classify_uses_mean_leg_length() {
        let classifier = SizeClassifier::default();
        let mut m = Measurements::cm(41.0, 47.0, 0.0);
        m.left_leg_length = 74.0;
        m.right_leg_length = 77.0;
        let sizes = classifier.classify(&m);
        assert_eq!(sizes.shoulders, M);
        assert_eq!(sizes.torso, M);
        // mean 75.5
        assert_eq!(sizes.legs, M);
        assert_eq!(sizes.overall, M);
    }

    #[test]
    fn test_overall_weights_favor_shoulders() {
        let classifier = SizeClassifier::default();
        // 0.5*5 + 0.3*2 + 0.2*2 = 3.5 -> rounds to 4
        assert_eq!(classifier.overall(XL, S, S), L);
        // 0.5*1 + 0.3*7 + 0.2*7 = 4.0
        assert_eq!(classifier.overall(XS, XXXL, XXXL), L);
    }

    #[test]
    fn test_overall_excludes_unknown() {
        let classifier = SizeClassifier::default();
        // (0.5*6 + 0.2*2) / 0.7 = 4.857 -> 5
        assert_eq!(classifier.overall(XXL, Unknown, S), XL);
        assert_eq!(classifier.overall(Unknown, Unknown, XS), XS);
    }

    #[test]
    fn test_all_unknown_is_unknown() {
        let classifier = SizeClassifier::default();
        assert_eq!(classifier.overall(Unknown, Unknown, Unknown), Unknown);

        let m = Measurements::cm(-1.0, -1.0, -1.0);
        let sizes = classifier.classify(&m);
        assert_eq!(sizes.overall, Unknown);
    }

    #[test]
    fn test_pixel_measurements_are_not_sized() {
        let mut m = Measurements::cm(41.0, 47.0, 78.0);
        m.unit = Unit::Px;
        let sizes = SizeClassifier::default().classify(&m);
        assert_eq!(sizes.shoulders, Unknown);
        assert_eq!(sizes.overall, Unknown);
    }
}
