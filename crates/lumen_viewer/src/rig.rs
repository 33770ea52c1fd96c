//! Interactive camera and light controls.
//!
//! Both rigs keep yaw/pitch angles and produce a `Transform`; the caller
//! pushes it into the watched handle only when input actually changed it.

use lumen_math::{EulerRot, Quat, Transform, Vec3};

const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Camera orbiting a target point at a fixed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitRig {
    /// Angles in radians.
    pub fn new(target: Vec3, distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
        }
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn transform(&self) -> Transform {
        Transform::looking_at(self.position(), self.target, Vec3::Y)
    }
}

/// Orientation of the directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub yaw: f32,
    pub pitch: f32,
}

impl LightRig {
    /// Angles in radians; negative pitch aims the light downwards.
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
        }
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn transform(&self) -> Transform {
        Transform::new(Vec3::ZERO, Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0))
    }
}
