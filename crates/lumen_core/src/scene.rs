//! Procedural sphere field.
//!
//! Spheres rest on the ground plane (center height equals radius) and are
//! scattered over a disk. Placement is single-pass rejection sampling: a
//! candidate that overlaps an earlier sphere is dropped, not retried, so a
//! dense configuration simply yields fewer spheres than requested.

use lumen_math::{gen_f32, random_color_hsv, random_in_disk, Color, Vec3};
use rand::Rng;

use crate::config::SceneConfig;
use crate::material::{MaterialKind, Surface};

/// A sphere accepted into the scene.
///
/// Immutable after placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    position: Vec3,
    radius: f32,
    kind: MaterialKind,
    surface: Surface,
}

impl PlacedObject {
    /// Create a sphere with the channels of `kind` applied to `color`.
    pub fn new(position: Vec3, radius: f32, kind: MaterialKind, color: Color) -> Self {
        Self {
            position,
            radius,
            kind,
            surface: kind.surface(color),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn albedo(&self) -> Color {
        self.surface.albedo
    }

    pub fn specular(&self) -> Color {
        self.surface.specular
    }

    pub fn refraction(&self) -> Color {
        self.surface.refraction
    }

    /// True if a sphere at `position` with `radius` would intersect this one.
    ///
    /// Touching spheres do not overlap.
    pub fn overlaps(&self, position: Vec3, radius: f32) -> bool {
        let min_dist = self.radius + radius;
        (position - self.position).length_squared() < min_dist * min_dist
    }
}

/// An ordered set of placed spheres. Rebuilt wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: Vec<PlacedObject>,
}

impl Scene {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    /// Number of spheres of the given kind.
    pub fn count_kind(&self, kind: MaterialKind) -> usize {
        self.objects.iter().filter(|o| o.kind() == kind).count()
    }
}

/// Populates scenes from a `SceneConfig`.
#[derive(Debug, Clone)]
pub struct SceneGenerator {
    config: SceneConfig,
}

impl SceneGenerator {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replace the parameters used by the next `generate`.
    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Run one pass of rejection sampling over `count_max` slots.
    ///
    /// Per slot the random stream is consumed as: radius, disk position
    /// (two draws), and only for accepted candidates the HSV color (three
    /// draws) followed by the material classification (one or two draws).
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Scene {
        let config = &self.config;
        let mut objects: Vec<PlacedObject> = Vec::with_capacity(config.count_max as usize);

        for _ in 0..config.count_max {
            let radius = config.radius_range.lerp(gen_f32(rng));
            let planar = random_in_disk(rng, config.placement_radius);
            let position = Vec3::new(planar.x, radius, planar.y);

            if objects.iter().any(|other| other.overlaps(position, radius)) {
                continue;
            }

            let color = random_color_hsv(rng);
            let kind = MaterialKind::draw(rng);
            objects.push(PlacedObject::new(position, radius, kind, color));
        }

        log::info!(
            "Placed {} of {} spheres (radius {:.2}..{:.2}, disk {:.1})",
            objects.len(),
            config.count_max,
            config.radius_range.min,
            config.radius_range.max,
            config.placement_radius
        );

        let scene = Scene { objects };
        for kind in MaterialKind::ALL {
            log::debug!("  {}: {}", kind.name(), scene.count_kind(kind));
        }
        scene
    }
}
