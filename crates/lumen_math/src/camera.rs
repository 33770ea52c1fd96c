use glam::Mat4;

/// Perspective lens of the viewing camera.
///
/// The pose lives elsewhere (a watched transform); this type only knows
/// how to project.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera lens
    pub fn new(fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: 0.3,
            far: 1000.0,
        }
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get the inverse projection matrix (clip → camera space)
    pub fn inverse_projection_matrix(&self) -> Mat4 {
        self.projection_matrix().inverse()
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        self.fov_y.to_degrees()
    }

    /// Set the field of view, clamped to a usable range of [1°, 179°]
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fov_y = degrees.clamp(1.0, 179.0).to_radians();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(60.0, 16.0 / 9.0)
    }
}
