//! Random sampling helpers shared by scene generation and frame jitter.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::color::{hsv_to_rgb, Color};

/// Uniform `f32` in [0, 1).
#[inline]
pub fn gen_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point inside a disk of the given radius centered at the origin.
///
/// Uses the square-root radial mapping (one draw for the radius, one for
/// the angle), so the density is uniform over the disk's area.
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let r = radius * gen_f32(rng).sqrt();
    let theta = TAU * gen_f32(rng);
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Uniform random color in HSV space (hue, saturation and value each in
/// [0, 1)), converted to RGB.
pub fn random_color_hsv<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let h = gen_f32(rng);
    let s = gen_f32(rng);
    let v = gen_f32(rng);
    hsv_to_rgb(h, s, v)
}
