//! Material taxonomy for generated spheres.
//!
//! The kernel has no material tag. It infers behavior from which of the
//! three color channels are zero:
//!
//! | kind    | albedo      | specular      | refraction |
//! |---------|-------------|---------------|------------|
//! | Metal   | 0           | color         | 0          |
//! | Glass   | color × 0.1 | color         | color      |
//! | Diffuse | color       | 0.04 (grey)   | 0          |
//!
//! `MaterialKind` carries the same information as an explicit tag on the
//! CPU side; the channel values it produces are exactly the table above.

use lumen_math::{gen_f32, Color};
use rand::Rng;

/// Reflectance of a generic dielectric at normal incidence.
pub const DIELECTRIC_SPECULAR: Color = Color::splat(0.04);

/// Probability that a sphere is metallic.
pub const METAL_PROBABILITY: f32 = 0.2;

/// Probability that a non-metallic sphere is glass.
pub const GLASS_PROBABILITY: f32 = 0.5;

/// Albedo attenuation applied to glass.
pub const GLASS_ALBEDO_SCALE: f32 = 0.1;

/// The three surface categories the kernel distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Metal,
    Glass,
    Diffuse,
}

/// Albedo / specular / refraction channels as uploaded to the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub albedo: Color,
    pub specular: Color,
    pub refraction: Color,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [MaterialKind::Metal, MaterialKind::Glass, MaterialKind::Diffuse];

    /// Classify with two nested draws: metal first (p = 0.2), then glass
    /// among the non-metals (p = 0.5). Overall 0.2 / 0.4 / 0.4.
    ///
    /// The glass draw is only made for non-metals, so a metal consumes one
    /// random number and the other kinds consume two.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if gen_f32(rng) < METAL_PROBABILITY {
            return MaterialKind::Metal;
        }

        if gen_f32(rng) < GLASS_PROBABILITY {
            MaterialKind::Glass
        } else {
            MaterialKind::Diffuse
        }
    }

    /// The channel triple for a sphere of this kind with base `color`.
    pub fn surface(self, color: Color) -> Surface {
        match self {
            MaterialKind::Metal => Surface {
                albedo: Color::ZERO,
                specular: color,
                refraction: Color::ZERO,
            },
            MaterialKind::Glass => Surface {
                albedo: color * GLASS_ALBEDO_SCALE,
                specular: color,
                refraction: color,
            },
            MaterialKind::Diffuse => Surface {
                albedo: color,
                specular: DIELECTRIC_SPECULAR,
                refraction: Color::ZERO,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Metal => "metal",
            MaterialKind::Glass => "glass",
            MaterialKind::Diffuse => "diffuse",
        }
    }
}
