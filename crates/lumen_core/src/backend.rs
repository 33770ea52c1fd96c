//! The rendering backend seam.
//!
//! Everything that touches the GPU goes through `RenderBackend`. Resource
//! handles are plain owned values: releasing one moves it into the
//! backend, so a released target or scene buffer can no longer be named by
//! the caller, let alone passed to `dispatch`.

use lumen_math::{Camera, Mat4, Vec2, Vec3, Vec4};

use crate::dispatch::DispatchGrid;
use crate::error::RenderResult;
use crate::scene::PlacedObject;
use crate::watch::TransformHandle;

/// Per-frame parameters bound to the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
    /// Sub-pixel jitter in [0, 1)², fresh every frame
    pub pixel_offset: Vec2,
    /// Light direction in xyz, intensity in w
    pub directional_light: Vec4,
    /// Number of spheres in the bound scene buffer (0 when none is bound)
    pub object_count: u32,
}

impl KernelParams {
    /// Package the camera and light state for one sample.
    pub fn new(
        camera_transform: &TransformHandle,
        lens: &Camera,
        light: &DirectionalLight,
        pixel_offset: Vec2,
        object_count: u32,
    ) -> Self {
        Self {
            camera_to_world: camera_transform.get().matrix(),
            inverse_projection: lens.inverse_projection_matrix(),
            pixel_offset,
            directional_light: light.packed(),
            object_count,
        }
    }
}

/// A directional light whose orientation is a watched transform.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub transform: TransformHandle,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(transform: TransformHandle, intensity: f32) -> Self {
        Self {
            transform,
            intensity,
        }
    }

    /// Direction the light travels in (its forward axis).
    pub fn direction(&self) -> Vec3 {
        self.transform.get().forward()
    }

    /// Direction in xyz and intensity in w, as the kernel expects.
    pub fn packed(&self) -> Vec4 {
        self.direction().extend(self.intensity)
    }
}

/// GPU operations the frame orchestrator drives.
///
/// Calls within a frame arrive in a fixed order: any releases and
/// allocations first, then `dispatch`, `composite` and `present`. The
/// backend may record them into one command stream; the queue is what
/// guarantees the kernel output is complete before it is composited.
pub trait RenderBackend {
    /// Off-screen accumulation image plus whatever the kernel writes into.
    type Target;

    /// Device-side sphere array.
    type SceneBuffer;

    /// Allocate a `width` × `height` accumulation target.
    ///
    /// Failure must be reported as `RenderError::AllocationFailure`.
    fn allocate_target(&mut self, width: u32, height: u32) -> RenderResult<Self::Target>;

    fn release_target(&mut self, target: Self::Target);

    /// Upload a non-empty sphere array.
    fn upload_scene(&mut self, objects: &[PlacedObject]) -> RenderResult<Self::SceneBuffer>;

    fn release_scene(&mut self, buffer: Self::SceneBuffer);

    /// Run the kernel once, producing a fresh sample for `target`.
    ///
    /// `scene` is `None` for an empty scene; the kernel must cope with
    /// zero spheres.
    fn dispatch(
        &mut self,
        params: &KernelParams,
        scene: Option<&Self::SceneBuffer>,
        target: &Self::Target,
        grid: DispatchGrid,
    ) -> RenderResult<()>;

    /// Blend the latest sample into the accumulation image with `weight`
    /// for the sample and `1 - weight` for the existing content.
    fn composite(&mut self, target: &Self::Target, weight: f32) -> RenderResult<()>;

    /// Show the accumulation image.
    fn present(&mut self, target: &Self::Target) -> RenderResult<()>;
}
