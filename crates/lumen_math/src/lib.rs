// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod camera;
mod color;
mod interval;
mod sampling;
mod transform;

pub use camera::Camera;
pub use color::{hsv_to_rgb, Color};
pub use interval::Interval;
pub use sampling::{gen_f32, random_color_hsv, random_in_disk};
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_color_is_vec3() {
        let c: Color = Vec3::new(0.25, 0.5, 1.0);
        assert_eq!(c * 2.0, Color::new(0.5, 1.0, 2.0));
    }
}
