//! Lumen Viewport - wgpu implementation of `lumen_core::RenderBackend`.
//!
//! Each frame records three passes:
//!
//! - **Kernel**: compute shader writing one noisy sample into an
//!   `rgba32float` storage texture (8×8 workgroups)
//! - **Composite**: compute shader blending the sample into the
//!   accumulation buffer with the running-average weight
//! - **Present**: full-screen triangle showing the accumulation buffer,
//!   followed by the egui overlay
//!
//! The two compute passes are submitted together before the surface is
//! acquired, so a lost surface never drops a sample.

pub mod gpu;
pub mod overlay;
pub mod skybox;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use bytemuck::Zeroable;
use wgpu::{util::DeviceExt, Device, Instance, Queue, Surface, SurfaceConfiguration};

use lumen_core::{
    DispatchGrid, KernelParams, PlacedObject, RenderBackend, RenderError, RenderResult, ResourceKind,
};

pub use gpu::{CompositeUniform, GpuSphere, KernelUniform, PresentUniform};
pub use overlay::{render_overlay, OverlayActions, OverlayStats};
pub use skybox::{Skybox, SkyboxImage};

/// Accumulation target: the kernel's output texture plus the running
/// average it is blended into.
pub struct GpuTarget {
    width: u32,
    height: u32,
    sample_texture: wgpu::Texture,
    sample_view: wgpu::TextureView,
    accumulation: wgpu::Buffer,
    present_uniform: wgpu::Buffer,
    composite_bind_group: wgpu::BindGroup,
    present_bind_group: wgpu::BindGroup,
}

impl GpuTarget {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Uploaded sphere array.
pub struct GpuSceneBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

/// egui output waiting for the next present.
struct OverlayFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Core renderer managing wgpu state
pub struct Renderer {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub size: (u32, u32),

    kernel_pipeline: wgpu::ComputePipeline,
    kernel_layout: wgpu::BindGroupLayout,
    kernel_uniform: wgpu::Buffer,
    composite_pipeline: wgpu::ComputePipeline,
    composite_layout: wgpu::BindGroupLayout,
    composite_uniform: wgpu::Buffer,
    present_pipeline: wgpu::RenderPipeline,
    present_layout: wgpu::BindGroupLayout,

    // Bound when the scene is empty; the kernel never reads it
    placeholder_spheres: wgpu::Buffer,
    skybox: Skybox,

    // Compute work recorded since the last present
    pending: Option<wgpu::CommandEncoder>,

    // egui state
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<OverlayFrame>,

    // UI state
    pub show_ui: bool,
    pub fps: f32,
    frame_count: u32,
    fps_update_timer: f32,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<winit::window::Window>, skybox_path: Option<&Path>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lumen Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        // Kernel
        let kernel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Kernel Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, wgpu::ShaderStages::COMPUTE, true),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba32Float,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let kernel_pipeline = compute_pipeline(
            &device,
            "Kernel",
            &kernel_layout,
            include_str!("shaders/kernel.wgsl"),
        );

        let kernel_uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Kernel Uniform Buffer"),
            size: std::mem::size_of::<KernelUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Composite
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::COMPUTE),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                storage_entry(2, wgpu::ShaderStages::COMPUTE, false),
            ],
        });

        let composite_pipeline = compute_pipeline(
            &device,
            "Composite",
            &composite_layout,
            include_str!("shaders/composite.wgsl"),
        );

        let composite_uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Composite Uniform Buffer"),
            size: std::mem::size_of::<CompositeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Present
        let present_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                storage_entry(1, wgpu::ShaderStages::FRAGMENT, true),
            ],
        });

        let present_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let present_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[&present_layout],
            push_constant_ranges: &[],
        });

        let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&present_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &present_shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &present_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let placeholder_spheres = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Placeholder Sphere Buffer"),
            contents: bytemuck::cast_slice(&[GpuSphere::zeroed()]),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let sky_image =
            SkyboxImage::load_or_gradient(skybox_path).fit_within(device.limits().max_texture_dimension_2d);
        let skybox = Skybox::upload(&device, &queue, &sky_image);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None, // max_texture_side (use default)
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            None, // No depth testing for egui
            1,
            false, // allow_srgb_render_target
        );

        log::info!("Renderer initialized ({}x{}, {:?})", config.width, config.height, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            size: (config.width, config.height),
            config,
            kernel_pipeline,
            kernel_layout,
            kernel_uniform,
            composite_pipeline,
            composite_layout,
            composite_uniform,
            present_pipeline,
            present_layout,
            placeholder_spheres,
            skybox,
            pending: None,
            egui_ctx,
            egui_state,
            egui_renderer,
            overlay: None,
            show_ui: true,
            fps: 0.0,
            frame_count: 0,
            fps_update_timer: 0.0,
        })
    }

    /// Handle window resize
    ///
    /// Only the surface is reconfigured here; the accumulation target is
    /// reallocated by the controller on the next frame.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Handle egui window event - returns true if event was consumed by egui
    pub fn handle_egui_event(&mut self, window: &winit::window::Window, event: &winit::event::WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// Update FPS counter (call each frame with delta_time)
    pub fn update_fps(&mut self, delta_time: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta_time;

        // Update FPS every 0.5 seconds
        if self.fps_update_timer >= 0.5 {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    /// Run the egui UI for this frame. The result is drawn by the next
    /// `present`.
    pub fn prepare_overlay(&mut self, window: &winit::window::Window, run_ui: impl FnMut(&egui::Context)) {
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self.egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        // Texture uploads from a frame that was never presented still apply
        let textures_delta = match self.overlay.take() {
            Some(stale) => {
                let mut merged = stale.textures_delta;
                merged.append(full_output.textures_delta);
                merged
            }
            None => full_output.textures_delta,
        };

        self.overlay = Some(OverlayFrame {
            paint_jobs,
            textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });
    }

    /// Run `create` inside out-of-memory and validation error scopes.
    fn allocate_scoped<T>(&self, resource: ResourceKind, create: impl FnOnce(&Device) -> T) -> RenderResult<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = create(&self.device);

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        match out_of_memory.or(validation) {
            Some(err) => Err(RenderError::allocation(resource, err.to_string())),
            None => Ok(value),
        }
    }

    fn submit_pending(&mut self) {
        if let Some(encoder) = self.pending.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    /// Draw the accumulation image and overlay into the surface texture.
    fn draw_present(&mut self, target: &GpuTarget, view: &wgpu::TextureView) {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Present Encoder"),
        });

        let overlay = self.overlay.take();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.0, self.size.1],
            pixels_per_point: overlay.as_ref().map_or(1.0, |o| o.pixels_per_point),
        };

        if let Some(overlay) = &overlay {
            for (id, image_delta) in &overlay.textures_delta.set {
                self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
            }
            self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &overlay.paint_jobs,
                &screen_descriptor,
            );
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.present_pipeline);
            render_pass.set_bind_group(0, &target.present_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        // Render egui on top
        if let Some(overlay) = &overlay {
            if self.show_ui {
                let mut egui_pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    })
                    .forget_lifetime(); // Need 'static lifetime for egui renderer

                self.egui_renderer.render(&mut egui_pass, &overlay.paint_jobs, &screen_descriptor);
            }

            for id in &overlay.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl RenderBackend for Renderer {
    type Target = GpuTarget;
    type SceneBuffer = GpuSceneBuffer;

    fn allocate_target(&mut self, width: u32, height: u32) -> RenderResult<GpuTarget> {
        gpu::check_target_limits(&self.device.limits(), width, height)?;

        let (sample_texture, accumulation) = self.allocate_scoped(ResourceKind::AccumulationTarget, |device| {
            let sample_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Sample Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });

            // Zero-initialized by wgpu
            let accumulation = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Accumulation Buffer"),
                size: width as u64 * height as u64 * gpu::ACCUMULATION_TEXEL_SIZE,
                usage: wgpu::BufferUsages::STORAGE,
                mapped_at_creation: false,
            });

            (sample_texture, accumulation)
        })?;

        let sample_view = sample_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let present_uniform = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Present Uniform Buffer"),
            contents: bytemuck::bytes_of(&PresentUniform::new(width, height)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let composite_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: &self.composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.composite_uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sample_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: accumulation.as_entire_binding(),
                },
            ],
        });

        let present_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Present Bind Group"),
            layout: &self.present_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: present_uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: accumulation.as_entire_binding(),
                },
            ],
        });

        log::debug!("Allocated {}x{} accumulation target", width, height);

        Ok(GpuTarget {
            width,
            height,
            sample_texture,
            sample_view,
            accumulation,
            present_uniform,
            composite_bind_group,
            present_bind_group,
        })
    }

    fn release_target(&mut self, target: GpuTarget) {
        // Work still queued against the target must reach the GPU first
        self.submit_pending();
        target.sample_texture.destroy();
        target.accumulation.destroy();
        target.present_uniform.destroy();
    }

    fn upload_scene(&mut self, objects: &[PlacedObject]) -> RenderResult<GpuSceneBuffer> {
        gpu::check_scene_limits(&self.device.limits(), objects.len())?;

        let spheres: Vec<GpuSphere> = objects.iter().map(GpuSphere::from).collect();
        let buffer = self.allocate_scoped(ResourceKind::SceneBuffer, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Buffer"),
                contents: bytemuck::cast_slice(&spheres),
                usage: wgpu::BufferUsages::STORAGE,
            })
        })?;

        log::debug!("Uploaded {} spheres ({} bytes)", spheres.len(), buffer.size());

        Ok(GpuSceneBuffer {
            buffer,
            count: spheres.len() as u32,
        })
    }

    fn release_scene(&mut self, buffer: GpuSceneBuffer) {
        self.submit_pending();
        buffer.buffer.destroy();
    }

    fn dispatch(
        &mut self,
        params: &KernelParams,
        scene: Option<&GpuSceneBuffer>,
        target: &GpuTarget,
        grid: DispatchGrid,
    ) -> RenderResult<()> {
        let bound_count = scene.map_or(0, |s| s.count);
        if bound_count != params.object_count {
            return Err(RenderError::Backend(format!(
                "kernel expects {} spheres but {} are bound",
                params.object_count, bound_count
            )));
        }

        self.queue
            .write_buffer(&self.kernel_uniform, 0, bytemuck::bytes_of(&KernelUniform::from_params(params)));

        let spheres = scene.map_or(&self.placeholder_spheres, |s| &s.buffer);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Kernel Bind Group"),
            layout: &self.kernel_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.kernel_uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: spheres.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&target.sample_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&self.skybox.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.skybox.sampler),
                },
            ],
        });

        let encoder = pending_encoder(&mut self.pending, &self.device);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Kernel Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.kernel_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(grid.groups_x, grid.groups_y, 1);

        Ok(())
    }

    fn composite(&mut self, target: &GpuTarget, weight: f32) -> RenderResult<()> {
        let uniform = CompositeUniform::new(target.width, target.height, weight);
        self.queue
            .write_buffer(&self.composite_uniform, 0, bytemuck::bytes_of(&uniform));

        let grid = DispatchGrid::for_viewport(target.width, target.height);
        let encoder = pending_encoder(&mut self.pending, &self.device);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Composite Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &target.composite_bind_group, &[]);
        pass.dispatch_workgroups(grid.groups_x, grid.groups_y, 1);

        Ok(())
    }

    fn present(&mut self, target: &GpuTarget) -> RenderResult<()> {
        self.submit_pending();

        let output = self.surface.get_current_texture().map_err(gpu::surface_error)?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.draw_present(target, &view);
        output.present();

        Ok(())
    }
}

fn pending_encoder<'a>(pending: &'a mut Option<wgpu::CommandEncoder>, device: &Device) -> &'a mut wgpu::CommandEncoder {
    pending.get_or_insert_with(|| {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Sample Encoder"),
        })
    })
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, visibility: wgpu::ShaderStages, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn compute_pipeline(device: &Device, name: &str, layout: &wgpu::BindGroupLayout, source: &str) -> wgpu::ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: "main",
        compilation_options: Default::default(),
        cache: None,
    })
}
