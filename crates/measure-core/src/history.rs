//! Bounded per-dimension measurement history.
//!
//! Landmark noise is roughly zero-mean from frame to frame, so a short
//! moving average removes most of the jitter at the cost of a few frames of
//! latency.

use std::collections::{BTreeMap, VecDeque};

use suitme_body_model::measurement::{Dimension, MeasurementSample};

/// Rolling window of the last N values for every dimension.
#[derive(Debug, Clone)]
pub struct MeasurementHistory {
    capacity: usize,
    values: BTreeMap<Dimension, VecDeque<f64>>,
}

impl MeasurementHistory {
    /// Create a history keeping `capacity` values per dimension (at least 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            values: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a value, evicting the oldest once the window is full.
    pub fn push(&mut self, dimension: Dimension, value: f64) {
        let capacity = self.capacity;
        let window = self
            .values
            .entry(dimension)
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        window.push_back(value);
        while window.len() > capacity {
            window.pop_front();
        }
    }

    /// Push every dimension present in the sample.
    ///
    /// A sample without a head height clears that window, so a hidden nose
    /// is never reported from older frames.
    pub fn push_sample(&mut self, sample: &MeasurementSample) {
        for (dimension, value) in sample.iter() {
            self.push(dimension, value);
        }
        if sample.head_height.is_none() {
            self.values.remove(&Dimension::HeadHeight);
        }
    }

    /// Arithmetic mean of the window, `None` while it is empty.
    pub fn average(&self, dimension: Dimension) -> Option<f64> {
        let window = self.values.get(&dimension)?;
        if window.is_empty() {
            return None;
        }
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }

    /// Number of values currently held for a dimension.
    pub fn len(&self, dimension: Dimension) -> usize {
        self.values.get(&dimension).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(VecDeque::is_empty)
    }

    /// Values for a dimension, oldest first.
    pub fn values(&self, dimension: Dimension) -> impl Iterator<Item = f64> + '_ {
        self.values
            .get(&dimension)
            .into_iter()
            .flat_map(|window| window.iter().copied())
    }

    /// Moving averages of all dimensions.
    ///
    /// `None` until every required dimension has at least one value.
    pub fn smoothed(&self) -> Option<MeasurementSample> {
        Some(MeasurementSample {
            shoulder_width: self.average(Dimension::ShoulderWidth)?,
            torso_length: self.average(Dimension::TorsoLength)?,
            hip_width: self.average(Dimension::HipWidth)?,
            left_leg_length: self.average(Dimension::LeftLegLength)?,
            right_leg_length: self.average(Dimension::RightLegLength)?,
            head_height: self.average(Dimension::HeadHeight),
        })
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
