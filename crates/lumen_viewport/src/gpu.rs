//! CPU-side mirrors of the structs the shaders read, plus the checks
//! run before asking the device for memory.

use lumen_core::{KernelParams, PlacedObject, RenderError, RenderResult, ResourceKind};

/// Bytes per accumulation texel (`vec4<f32>`).
pub const ACCUMULATION_TEXEL_SIZE: u64 = 16;

/// Kernel uniform, `Params` in kernel.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelUniform {
    pub camera_to_world: [[f32; 4]; 4],
    pub inverse_projection: [[f32; 4]; 4],
    pub pixel_offset: [f32; 2],
    pub sphere_count: u32,
    _pad: u32,
    /// Direction in xyz, intensity in w
    pub directional_light: [f32; 4],
}

impl KernelUniform {
    pub fn from_params(params: &KernelParams) -> Self {
        Self {
            camera_to_world: params.camera_to_world.to_cols_array_2d(),
            inverse_projection: params.inverse_projection.to_cols_array_2d(),
            pixel_offset: params.pixel_offset.to_array(),
            sphere_count: params.object_count,
            _pad: 0,
            directional_light: params.directional_light.to_array(),
        }
    }
}

/// One sphere in the kernel's storage buffer. 52 bytes, no padding; the
/// shader declares the vectors as `array<f32, 3>` to get the same stride.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSphere {
    pub position: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub refraction: [f32; 3],
}

impl From<&PlacedObject> for GpuSphere {
    fn from(object: &PlacedObject) -> Self {
        Self {
            position: object.position().to_array(),
            radius: object.radius(),
            albedo: object.albedo().to_array(),
            specular: object.specular().to_array(),
            refraction: object.refraction().to_array(),
        }
    }
}

/// Composite pass uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    pub width: u32,
    pub height: u32,
    /// Weight of the new sample, `1 / (n + 1)`
    pub weight: f32,
    _pad: u32,
}

impl CompositeUniform {
    pub fn new(width: u32, height: u32, weight: f32) -> Self {
        Self {
            width,
            height,
            weight,
            _pad: 0,
        }
    }
}

/// Present pass uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PresentUniform {
    pub width: u32,
    pub height: u32,
    _pad: [u32; 2],
}

impl PresentUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            _pad: [0; 2],
        }
    }
}

/// Reject target sizes the device can never satisfy.
pub fn check_target_limits(limits: &wgpu::Limits, width: u32, height: u32) -> RenderResult<()> {
    let max_dim = limits.max_texture_dimension_2d;
    if width > max_dim || height > max_dim {
        return Err(RenderError::allocation(
            ResourceKind::AccumulationTarget,
            format!("{}x{} exceeds max texture dimension {}", width, height, max_dim),
        ));
    }

    let bytes = width as u64 * height as u64 * ACCUMULATION_TEXEL_SIZE;
    let max_bytes = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    if bytes > max_bytes {
        return Err(RenderError::allocation(
            ResourceKind::AccumulationTarget,
            format!("{} bytes exceeds storage buffer limit {}", bytes, max_bytes),
        ));
    }

    Ok(())
}

/// Reject sphere arrays larger than a storage binding.
pub fn check_scene_limits(limits: &wgpu::Limits, count: usize) -> RenderResult<()> {
    let bytes = count as u64 * std::mem::size_of::<GpuSphere>() as u64;
    let max_bytes = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    if bytes > max_bytes {
        return Err(RenderError::allocation(
            ResourceKind::SceneBuffer,
            format!("{} spheres ({} bytes) exceeds storage buffer limit {}", count, bytes, max_bytes),
        ));
    }
    Ok(())
}

pub fn surface_error(err: wgpu::SurfaceError) -> RenderError {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
        wgpu::SurfaceError::OutOfMemory => RenderError::SurfaceOutOfMemory,
        other => RenderError::Surface(other.to_string()),
    }
}
