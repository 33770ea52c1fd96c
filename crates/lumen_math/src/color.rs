//! Linear RGB colors and HSV conversion.

use glam::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Convert hue/saturation/value (each in [0, 1]) to RGB.
///
/// Hue wraps, so `h = 1.0` is the same red as `h = 0.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    if s <= 0.0 {
        return Color::splat(v);
    }

    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => Color::new(v, t, p),
        1 => Color::new(q, v, p),
        2 => Color::new(p, v, t),
        3 => Color::new(p, q, v),
        4 => Color::new(t, p, v),
        _ => Color::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Color, b: Color) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_primary_hues() {
        assert!(approx(hsv_to_rgb(0.0, 1.0, 1.0), Color::new(1.0, 0.0, 0.0)));
        assert!(approx(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Color::new(0.0, 1.0, 0.0)));
        assert!(approx(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Color::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hue_wraps() {
        assert!(approx(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        assert_eq!(hsv_to_rgb(0.42, 0.0, 0.3), Color::splat(0.3));
    }

    #[test]
    fn test_value_scales_brightness() {
        let c = hsv_to_rgb(0.1, 0.7, 0.5);
        assert!((c.max_element() - 0.5).abs() < 1e-5);
        assert!(c.min_element() >= 0.0);
    }
}
