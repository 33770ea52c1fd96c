mod config;
mod rig;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use lumen_core::{DirectionalLight, FrameInputs, FrameOrchestrator, RenderError, SceneConfig, TransformHandle};
use lumen_math::{Camera, Vec3};
use lumen_viewport::{render_overlay, OverlayActions, OverlayStats, Renderer};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::rig::{LightRig, OrbitRig};

const ORBIT_SENSITIVITY: f32 = 0.005;
const LIGHT_STEP: f32 = 5.0 * std::f32::consts::PI / 180.0;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    Regenerate,
    ToggleUi,
    /// Yaw and pitch deltas in radians
    RotateLight(f32, f32),
    Quit,
}

fn key_action(keycode: KeyCode) -> Option<KeyAction> {
    match keycode {
        KeyCode::KeyR => Some(KeyAction::Regenerate),
        KeyCode::KeyH => Some(KeyAction::ToggleUi),
        KeyCode::ArrowLeft => Some(KeyAction::RotateLight(-LIGHT_STEP, 0.0)),
        KeyCode::ArrowRight => Some(KeyAction::RotateLight(LIGHT_STEP, 0.0)),
        KeyCode::ArrowUp => Some(KeyAction::RotateLight(0.0, LIGHT_STEP)),
        KeyCode::ArrowDown => Some(KeyAction::RotateLight(0.0, -LIGHT_STEP)),
        KeyCode::Escape => Some(KeyAction::Quit),
        _ => None,
    }
}

/// Application state
struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    orchestrator: FrameOrchestrator<Renderer>,

    camera: TransformHandle,
    camera_rig: OrbitRig,
    light: TransformHandle,
    light_rig: LightRig,
    lens: Camera,

    // Generation settings being edited in the panel
    draft: SceneConfig,

    // Input state
    left_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    last_frame_time: Instant,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let camera_rig = OrbitRig::new(
            Vec3::ZERO,
            config.camera.distance,
            config.camera.yaw_degrees.to_radians(),
            config.camera.pitch_degrees.to_radians(),
        );
        let light_rig = LightRig::new(
            config.light.yaw_degrees.to_radians(),
            config.light.pitch_degrees.to_radians(),
        );

        let camera = TransformHandle::new(camera_rig.transform());
        let light = TransformHandle::new(light_rig.transform());
        let aspect = config.window_width as f32 / config.window_height as f32;

        let orchestrator = FrameOrchestrator::new(
            config.scene,
            camera.clone(),
            DirectionalLight::new(light.clone(), config.light.intensity),
            config.seed,
        );

        Self {
            lens: Camera::new(config.camera.field_of_view, aspect),
            draft: config.scene,
            config,
            window: None,
            renderer: None,
            orchestrator,
            camera,
            camera_rig,
            light,
            light_rig,
            left_mouse_pressed: false,
            last_mouse_pos: None,
            last_frame_time: Instant::now(),
        }
    }

    /// Adopt the panel's settings and rebuild the scene.
    fn regenerate(&mut self) {
        match self.orchestrator.set_scene_config(self.draft) {
            Ok(()) => log::info!("Regenerating scene"),
            Err(e) => log::warn!("Not regenerating: {}", e),
        }
    }

    /// Release GPU resources and leave the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &mut self.renderer {
            self.orchestrator.disable(renderer);
        }
        event_loop.exit();
    }

    fn rotate_light(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.light_rig.rotate(delta_yaw, delta_pitch);
        self.light.set(self.light_rig.transform());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        let actions = {
            let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
                return;
            };

            renderer.update_fps(delta_time);

            let stats = OverlayStats {
                fps: renderer.fps,
                sample_count: self.orchestrator.accumulation_state().sample_count,
                resolution: renderer.size,
                field_of_view_deg: self.lens.fov_degrees(),
                ..Default::default()
            }
            .with_scene(self.orchestrator.scene());

            let mut draft = self.draft;
            let mut actions = OverlayActions::default();
            renderer.prepare_overlay(window, |ctx| {
                actions = render_overlay(ctx, &stats, &mut draft);
            });
            self.draft = draft;
            actions
        };

        if actions.regenerate {
            self.regenerate();
        }

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        // Zero while minimized, which skips the frame
        let viewport = window.inner_size();
        let inputs = FrameInputs::new((viewport.width, viewport.height), self.lens);
        match self.orchestrator.render_frame(renderer, &inputs) {
            Ok(_) => {}
            Err(RenderError::SurfaceLost) => {
                // Surface lost, reconfigure
                renderer.reconfigure();
            }
            Err(RenderError::SurfaceOutOfMemory) => {
                log::error!("Out of memory!");
                event_loop.exit();
            }
            Err(e) => {
                log::error!("Render error: {}", e);
            }
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Lumen")
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            // Initialize renderer (async in pollster block)
            let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.skybox.as_deref()))
                .expect("Failed to initialize renderer");

            self.lens.set_aspect(renderer.size.0 as f32 / renderer.size.1 as f32);
            self.window = Some(window);
            self.renderer = Some(renderer);
            self.orchestrator.enable();

            log::info!("Window and renderer initialized");
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_egui_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((physical_size.width, physical_size.height));
                    if physical_size.height > 0 {
                        self.lens
                            .set_aspect(physical_size.width as f32 / physical_size.height as f32);
                    }
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if button == MouseButton::Left {
                    self.left_mouse_pressed = state == ElementState::Pressed;
                    if !self.left_mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.left_mouse_pressed {
                    if let Some(last_pos) = self.last_mouse_pos {
                        let delta_x = (position.x - last_pos.0) as f32;
                        let delta_y = (position.y - last_pos.1) as f32;

                        self.camera_rig
                            .orbit(-delta_x * ORBIT_SENSITIVITY, delta_y * ORBIT_SENSITIVITY);
                        self.camera.set(self.camera_rig.transform());
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Scroll narrows or widens the field of view
                let scroll_amount = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y * 2.0,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                let fov = self.lens.fov_degrees() - scroll_amount;
                self.lens.set_fov_degrees(fov);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_action(keycode) {
                Some(KeyAction::Regenerate) => self.orchestrator.request_regeneration(),
                Some(KeyAction::ToggleUi) => {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.show_ui = !renderer.show_ui;
                    }
                }
                Some(KeyAction::RotateLight(yaw, pitch)) => self.rotate_light(yaw, pitch),
                Some(KeyAction::Quit) => {
                    log::info!("Escape pressed");
                    self.shutdown(event_loop);
                }
                None => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Lumen");

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(Path::new(&path))?,
        None => ViewerConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    Ok(())
}
