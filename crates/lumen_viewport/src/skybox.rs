//! Equirectangular environment image sampled by the kernel on escape.

use std::path::Path;

use anyhow::Result;
use lumen_math::{Color, Vec3};

/// Size of the procedural fallback.
const GRADIENT_WIDTH: u32 = 4;
const GRADIENT_HEIGHT: u32 = 64;

const HORIZON: Color = Vec3::new(0.95, 0.92, 0.88);
const ZENITH: Color = Vec3::new(0.35, 0.55, 0.9);
const GROUND: Color = Vec3::new(0.3, 0.28, 0.25);

/// 8-bit sRGB pixels, row-major, top row is straight up.
#[derive(Clone, Debug)]
pub struct SkyboxImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SkyboxImage {
    /// Load any format the `image` crate decodes.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open skybox {}: {}", path.display(), e))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded skybox {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Vertical sky gradient: zenith blue fading to a warm horizon, then
    /// a dark ground below it.
    pub fn gradient() -> Self {
        let mut pixels = Vec::with_capacity((GRADIENT_WIDTH * GRADIENT_HEIGHT * 4) as usize);

        for y in 0..GRADIENT_HEIGHT {
            // +1 at the top row, -1 at the bottom
            let elevation = 1.0 - 2.0 * (y as f32 + 0.5) / GRADIENT_HEIGHT as f32;
            let color = if elevation >= 0.0 {
                HORIZON.lerp(ZENITH, elevation.sqrt())
            } else {
                HORIZON.lerp(GROUND, (-elevation).sqrt())
            };
            let texel = to_srgb8(color);
            for _ in 0..GRADIENT_WIDTH {
                pixels.extend_from_slice(&texel);
            }
        }

        Self {
            width: GRADIENT_WIDTH,
            height: GRADIENT_HEIGHT,
            pixels,
        }
    }

    /// Downscale so neither side exceeds `max_dimension`, keeping the
    /// aspect ratio. Images already within the limit are returned as is.
    pub fn fit_within(self, max_dimension: u32) -> Self {
        if self.width <= max_dimension && self.height <= max_dimension {
            return self;
        }

        let scale = max_dimension as f32 / self.width.max(self.height) as f32;
        let width = ((self.width as f32 * scale).round() as u32).clamp(1, max_dimension);
        let height = ((self.height as f32 * scale).round() as u32).clamp(1, max_dimension);

        let Some(rgba) = image::RgbaImage::from_raw(self.width, self.height, self.pixels) else {
            log::warn!("Skybox pixel data does not match its size; using procedural sky");
            return Self::gradient();
        };
        let resized = image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle);

        log::warn!(
            "Skybox {}x{} exceeds the {} texel limit, downscaled to {}x{}",
            self.width,
            self.height,
            max_dimension,
            width,
            height
        );

        Self {
            width,
            height,
            pixels: resized.into_raw(),
        }
    }

    /// Load `path` if given, falling back to the gradient on any failure.
    pub fn load_or_gradient(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(image)) => image,
            Some(Err(e)) => {
                log::warn!("{}; using procedural sky", e);
                Self::gradient()
            }
            None => Self::gradient(),
        }
    }
}

fn to_srgb8(linear: Color) -> [u8; 4] {
    let encode = |c: f32| {
        let c = c.clamp(0.0, 1.0);
        let s = if c <= 0.003_130_8 {
            c * 12.92
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        };
        (s * 255.0).round() as u8
    };
    [encode(linear.x), encode(linear.y), encode(linear.z), 255]
}

/// Skybox texture bound to the kernel.
pub struct Skybox {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Skybox {
    /// `image` must already fit the device's 2D texture limit.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &SkyboxImage) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }
}
