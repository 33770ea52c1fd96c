//! Error types for scene configuration and frame rendering.

use std::fmt;

use thiserror::Error;

/// GPU-side resources owned by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    AccumulationTarget,
    SceneBuffer,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::AccumulationTarget => write!(f, "accumulation target"),
            ResourceKind::SceneBuffer => write!(f, "scene buffer"),
        }
    }
}

/// Errors that abort the current frame.
///
/// None of these are retried; the next frame starts from whatever state
/// the controller was left in.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to allocate {resource}: {reason}")]
    AllocationFailure { resource: ResourceKind, reason: String },

    #[error("Accumulation target is not allocated")]
    TargetMissing,

    #[error("Presentation surface lost or outdated")]
    SurfaceLost,

    #[error("Presentation surface out of memory")]
    SurfaceOutOfMemory,

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl RenderError {
    /// Shorthand for an `AllocationFailure`.
    pub fn allocation(resource: ResourceKind, reason: impl Into<String>) -> Self {
        RenderError::AllocationFailure {
            resource,
            reason: reason.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by `SceneConfig::validate`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Radius range is not ordered: [{min}, {max}]")]
    InvalidRadiusRange { min: f32, max: f32 },

    #[error("Minimum radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("Placement radius must be finite and non-negative, got {0}")]
    InvalidPlacementRadius(f32),
}
