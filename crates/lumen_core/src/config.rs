//! Scene population parameters.

use lumen_math::Interval;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The externally tunable parameters of scene generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneConfig {
    /// Range sphere radii are drawn from
    pub radius_range: Interval,

    /// Number of placement attempts (upper bound on the sphere count)
    pub count_max: u32,

    /// Radius of the ground disk sphere centers are drawn from
    pub placement_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            radius_range: Interval::new(3.0, 8.0),
            count_max: 100,
            placement_radius: 100.0,
        }
    }
}

impl SceneConfig {
    /// Check that every generated sphere will have a positive radius and
    /// that the placement disk is well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.radius_range;
        if !range.is_ordered() {
            return Err(ConfigError::InvalidRadiusRange {
                min: range.min,
                max: range.max,
            });
        }

        if range.min <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(range.min));
        }

        if !self.placement_radius.is_finite() || self.placement_radius < 0.0 {
            return Err(ConfigError::InvalidPlacementRadius(self.placement_radius));
        }

        Ok(())
    }
}
