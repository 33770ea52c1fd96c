use serde::{Deserialize, Serialize};

/// A closed scalar range `[min, max]`.
///
/// Used for configuration ranges such as the sphere radius range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Maps `t` in [0, 1] onto the interval: `min + t * (max - min)`.
    ///
    /// With `t` drawn uniformly this is a uniform draw from the interval.
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * self.size()
    }

    /// True when `min <= max` and both ends are finite.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}
