//! Per-frame driver tying scene generation, change tracking and
//! accumulation to a `RenderBackend`.

use lumen_math::{gen_f32, Camera, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::accumulation::{AccumulationController, AccumulationState, Invalidations};
use crate::backend::{DirectionalLight, KernelParams, RenderBackend};
use crate::config::SceneConfig;
use crate::dispatch::DispatchGrid;
use crate::error::{ConfigError, RenderResult};
use crate::scene::{Scene, SceneGenerator};
use crate::tracker::FrameStateTracker;
use crate::watch::TransformHandle;

/// Values polled from the window and camera each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    /// Viewport size in pixels
    pub viewport: (u32, u32),
    pub lens: Camera,
}

impl FrameInputs {
    pub fn new(viewport: (u32, u32), lens: Camera) -> Self {
        Self { viewport, lens }
    }
}

/// What happened during one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Samples already in the target when this one was blended in
    pub sample_index: u32,
    pub blend_weight: f32,
    pub invalidations: Invalidations,
    /// Spheres bound to the kernel
    pub object_count: u32,
    pub grid: DispatchGrid,
}

/// Runs the fixed per-frame sequence:
///
/// 1. (re)build the scene if a session just started or a rebuild was asked for
/// 2. poll watched transforms and field of view
/// 3. reconcile accumulation state (may reallocate the target)
/// 4. package kernel parameters
/// 5. dispatch the kernel over 8×8 tiles
/// 6. composite the sample with weight `1 / (n + 1)`
/// 7. present
pub struct FrameOrchestrator<B: RenderBackend> {
    generator: SceneGenerator,
    scene: Scene,
    scene_buffer: Option<B::SceneBuffer>,
    tracker: FrameStateTracker,
    accumulation: AccumulationController<B>,
    camera: TransformHandle,
    light: DirectionalLight,
    rng: StdRng,
    rebuild_pending: bool,
    enabled: bool,
}

impl<B: RenderBackend> FrameOrchestrator<B> {
    /// Create a disabled orchestrator watching `camera` and the light.
    ///
    /// `seed` makes generation and jitter reproducible; `None` seeds from
    /// the OS.
    pub fn new(config: SceneConfig, camera: TransformHandle, light: DirectionalLight, seed: Option<u64>) -> Self {
        let mut tracker = FrameStateTracker::new();
        tracker.register_watched(camera.clone());
        tracker.register_watched(light.transform.clone());

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            generator: SceneGenerator::new(config),
            scene: Scene::empty(),
            scene_buffer: None,
            tracker,
            accumulation: AccumulationController::new(),
            camera,
            light,
            rng,
            rebuild_pending: false,
            enabled: false,
        }
    }

    /// Start a session. The next frame regenerates the whole scene.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.rebuild_pending = true;
        self.accumulation.enable();
        log::info!("Progressive renderer enabled");
    }

    /// End the session and release every GPU resource.
    pub fn disable(&mut self, backend: &mut B) {
        if !self.enabled {
            return;
        }
        if let Some(buffer) = self.scene_buffer.take() {
            backend.release_scene(buffer);
        }
        self.scene = Scene::empty();
        self.accumulation.disable(backend);
        self.rebuild_pending = false;
        self.enabled = false;
        log::info!("Progressive renderer disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rebuild the scene on the next frame with the current configuration.
    pub fn request_regeneration(&mut self) {
        self.rebuild_pending = true;
        self.accumulation.request_scene_reinit();
    }

    /// Validate and adopt new generation parameters, then schedule a rebuild.
    pub fn set_scene_config(&mut self, config: SceneConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.generator.set_config(config);
        self.request_regeneration();
        Ok(())
    }

    pub fn scene_config(&self) -> &SceneConfig {
        self.generator.config()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn accumulation_state(&self) -> &AccumulationState {
        self.accumulation.state()
    }

    pub fn camera(&self) -> &TransformHandle {
        &self.camera
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    fn bound_object_count(&self) -> u32 {
        if self.scene_buffer.is_some() {
            self.scene.len() as u32
        } else {
            0
        }
    }

    /// Generate a new scene, release the old buffer, upload the new one.
    fn rebuild_scene(&mut self, backend: &mut B) -> RenderResult<()> {
        let scene = self.generator.generate(&mut self.rng);

        if let Some(old) = self.scene_buffer.take() {
            backend.release_scene(old);
        }

        self.scene = scene;
        if self.scene.is_empty() {
            log::info!("Scene is empty, kernel will run without a sphere buffer");
        } else {
            self.scene_buffer = Some(backend.upload_scene(self.scene.objects())?);
        }
        Ok(())
    }

    /// Render one progressive sample.
    ///
    /// Returns `Ok(None)` when disabled or when the viewport has no area
    /// (e.g. a minimized window). Errors abort the frame.
    pub fn render_frame(&mut self, backend: &mut B, inputs: &FrameInputs) -> RenderResult<Option<FrameReport>> {
        if !self.enabled {
            return Ok(None);
        }

        let (width, height) = inputs.viewport;
        if width == 0 || height == 0 {
            log::trace!("Skipping frame for empty viewport");
            return Ok(None);
        }

        // A failed target allocation later in the frame keeps this scene
        if self.rebuild_pending {
            self.rebuild_scene(backend)?;
            self.rebuild_pending = false;
        }

        let signals = self.tracker.poll(inputs.lens.fov_y);
        let invalidations = self.accumulation.reconcile(backend, inputs.viewport, &signals)?;

        let pixel_offset = Vec2::new(gen_f32(&mut self.rng), gen_f32(&mut self.rng));
        let object_count = self.bound_object_count();
        let params = KernelParams::new(&self.camera, &inputs.lens, &self.light, pixel_offset, object_count);

        let grid = DispatchGrid::for_viewport(width, height);
        let sample_index = self.accumulation.sample_count();
        let blend_weight = self.accumulation.blend_weight();

        let target = self.accumulation.current_target()?;
        backend.dispatch(&params, self.scene_buffer.as_ref(), target, grid)?;
        backend.composite(target, blend_weight)?;
        self.accumulation.advance();

        backend.present(self.accumulation.current_target()?)?;

        Ok(Some(FrameReport {
            sample_index,
            blend_weight,
            invalidations,
            object_count,
            grid,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::testing::{Event, RecordingBackend};
    use lumen_math::{Color, Transform, Vec3};

    type Orchestrator = FrameOrchestrator<RecordingBackend>;

    const VIEWPORT: (u32, u32) = (20, 12);

    fn orchestrator(config: SceneConfig) -> Orchestrator {
        let camera = TransformHandle::new(Transform::looking_at(Vec3::new(0.0, 20.0, 80.0), Vec3::ZERO, Vec3::Y));
        let light = DirectionalLight::new(TransformHandle::default(), 0.8);
        let mut orchestrator = Orchestrator::new(config, camera, light, Some(17));
        orchestrator.enable();
        orchestrator
    }

    fn inputs() -> FrameInputs {
        FrameInputs::new(VIEWPORT, Camera::new(60.0, 20.0 / 12.0))
    }

    fn frame(o: &mut Orchestrator, backend: &mut RecordingBackend) -> FrameReport {
        o.render_frame(backend, &inputs()).unwrap().unwrap()
    }

    #[test]
    fn test_first_frame_sequence() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());

        let report = frame(&mut o, &mut backend);

        assert_eq!(report.sample_index, 0);
        assert_eq!(report.blend_weight, 1.0);
        assert!(report.invalidations.resized && report.invalidations.scene);
        assert_eq!(report.object_count as usize, o.scene().len());

        let events = backend.events();
        assert!(matches!(events[0], Event::UploadScene { .. }));
        assert!(matches!(events[1], Event::AllocateTarget { width: 20, height: 12, .. }));
        assert!(matches!(events[2], Event::Dispatch { scene: Some(_), .. }));
        assert!(matches!(events[3], Event::Composite { weight, .. } if weight == 1.0));
        assert!(matches!(events[4], Event::Present { .. }));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_empty_scene_dispatches_without_buffer() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig {
            count_max: 0,
            ..Default::default()
        });

        let report = frame(&mut o, &mut backend);

        assert!(o.scene().is_empty());
        assert_eq!(report.object_count, 0);
        assert_eq!(backend.live_scenes(), 0);
        match backend.dispatches()[0] {
            Event::Dispatch { scene, params, .. } => {
                assert!(scene.is_none());
                assert_eq!(params.object_count, 0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_static_frames_accumulate_running_average() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());

        for k in 0..12u32 {
            backend.set_sample_color(Color::splat(k as f32));
            let report = frame(&mut o, &mut backend);

            assert_eq!(report.sample_index, k);
            assert_eq!(report.blend_weight, 1.0 / (k as f32 + 1.0));
            assert_eq!(report.invalidations.any(), k == 0);
            assert_eq!(o.accumulation_state().sample_count, k + 1);
        }

        // Mean of 0..12 is 5.5
        let target = o.accumulation.target().unwrap();
        for p in &backend.accumulation(target).pixels {
            assert!((*p - Color::splat(5.5)).abs().max_element() < 1e-4);
        }
    }

    #[test]
    fn test_camera_move_resets_once() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        for _ in 0..4 {
            frame(&mut o, &mut backend);
        }

        o.camera().update(|t| t.position.x += 1.0);
        let moved = frame(&mut o, &mut backend);
        assert!(moved.invalidations.transform);
        assert_eq!(moved.sample_index, 0);

        let next = frame(&mut o, &mut backend);
        assert!(!next.invalidations.any());
        assert_eq!(next.sample_index, 1);
    }

    #[test]
    fn test_light_move_resets() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);
        frame(&mut o, &mut backend);

        o.light().transform.update(|t| t.rotation = lumen_math::Quat::from_rotation_x(-0.5));
        assert_eq!(frame(&mut o, &mut backend).sample_index, 0);
    }

    #[test]
    fn test_fov_change_resets() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);
        frame(&mut o, &mut backend);

        let mut zoomed = inputs();
        zoomed.lens.set_fov_degrees(30.0);
        let report = o.render_frame(&mut backend, &zoomed).unwrap().unwrap();

        assert!(report.invalidations.field_of_view);
        assert_eq!(report.sample_index, 0);
        assert_eq!(o.accumulation_state().last_field_of_view, zoomed.lens.fov_y);
    }

    #[test]
    fn test_resize_releases_before_dispatch() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        for _ in 0..5 {
            frame(&mut o, &mut backend);
        }
        backend.clear_events();

        let resized = FrameInputs::new((33, 17), inputs().lens);
        let report = o.render_frame(&mut backend, &resized).unwrap().unwrap();

        assert!(report.invalidations.resized);
        assert_eq!(report.sample_index, 0);
        assert_eq!((report.grid.groups_x, report.grid.groups_y), (5, 3));
        assert_eq!(o.accumulation_state().target_width, 33);
        assert_eq!(o.accumulation_state().target_height, 17);

        let events = backend.events();
        let (old, new) = match (&events[0], &events[1]) {
            (Event::ReleaseTarget { id: old }, Event::AllocateTarget { id: new, .. }) => (*old, *new),
            other => panic!("unexpected events {:?}", other),
        };
        assert_ne!(old, new);
        assert!(matches!(events[2], Event::Dispatch { target, .. } if target == new));
    }

    #[test]
    fn test_regeneration_releases_old_buffer_first() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);
        backend.clear_events();

        o.request_regeneration();
        let report = frame(&mut o, &mut backend);

        assert!(report.invalidations.scene);
        assert_eq!(report.sample_index, 0);
        assert!(matches!(backend.events()[0], Event::ReleaseScene { .. }));
        assert!(matches!(backend.events()[1], Event::UploadScene { .. }));
        assert_eq!(backend.live_scenes(), 1);
    }

    #[test]
    fn test_new_config_applies_on_next_frame() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);

        let config = SceneConfig {
            count_max: 3,
            ..Default::default()
        };
        o.set_scene_config(config).unwrap();
        frame(&mut o, &mut backend);

        assert!(o.scene().len() <= 3);
        assert_eq!(o.scene_config().count_max, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut o = orchestrator(SceneConfig::default());
        let bad = SceneConfig {
            radius_range: lumen_math::Interval::new(-1.0, 1.0),
            ..Default::default()
        };

        assert!(o.set_scene_config(bad).is_err());
        assert_eq!(*o.scene_config(), SceneConfig::default());
    }

    #[test]
    fn test_disable_releases_and_reenable_regenerates() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);
        frame(&mut o, &mut backend);

        o.disable(&mut backend);
        assert_eq!(backend.live_targets(), 0);
        assert_eq!(backend.live_scenes(), 0);
        assert!(o.render_frame(&mut backend, &inputs()).unwrap().is_none());

        backend.clear_events();
        o.enable();
        let report = frame(&mut o, &mut backend);

        assert!(report.invalidations.scene && report.invalidations.resized);
        assert_eq!(report.sample_index, 0);
        assert!(matches!(backend.events()[0], Event::UploadScene { .. }));
    }

    #[test]
    fn test_zero_viewport_skipped() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());

        let minimized = FrameInputs::new((0, 300), inputs().lens);
        assert!(o.render_frame(&mut backend, &minimized).unwrap().is_none());
        assert!(backend.events().is_empty());
    }

    #[test]
    fn test_scene_upload_failure_is_fatal() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        backend.fail_next_scene_upload();

        let err = o.render_frame(&mut backend, &inputs()).unwrap_err();

        assert!(matches!(err, RenderError::AllocationFailure { .. }));
        assert!(backend.dispatches().is_empty());
    }

    #[test]
    fn test_target_failure_skips_dispatch() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        backend.fail_next_target_allocation();

        assert!(o.render_frame(&mut backend, &inputs()).is_err());
        assert!(backend.dispatches().is_empty());

        // Next frame recovers with a fresh target
        let report = frame(&mut o, &mut backend);
        assert_eq!(report.sample_index, 0);
    }

    #[test]
    fn test_fov_recorded_across_failed_allocation() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);
        frame(&mut o, &mut backend);

        let mut zoomed = FrameInputs::new((40, 24), inputs().lens);
        zoomed.lens.set_fov_degrees(30.0);
        backend.fail_next_target_allocation();
        assert!(o.render_frame(&mut backend, &zoomed).is_err());

        let report = o.render_frame(&mut backend, &zoomed).unwrap().unwrap();
        assert!(report.invalidations.resized);
        assert!(!report.invalidations.field_of_view);
        assert_eq!(report.sample_index, 0);
        assert_eq!(o.accumulation_state().last_field_of_view, zoomed.lens.fov_y);
    }

    #[test]
    fn test_failed_allocation_keeps_regenerated_scene() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);

        o.request_regeneration();
        backend.fail_next_target_allocation();
        let resized = FrameInputs::new((40, 24), inputs().lens);
        assert!(o.render_frame(&mut backend, &resized).is_err());
        let scene = o.scene().clone();
        backend.clear_events();

        let report = o.render_frame(&mut backend, &resized).unwrap().unwrap();

        assert_eq!(*o.scene(), scene);
        assert_eq!(report.sample_index, 0);
        assert!(!backend
            .events()
            .iter()
            .any(|e| matches!(e, Event::UploadScene { .. } | Event::ReleaseScene { .. })));
        assert_eq!(backend.live_scenes(), 1);
    }

    #[test]
    fn test_jitter_in_unit_square() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        for _ in 0..8 {
            frame(&mut o, &mut backend);
        }

        let offsets: Vec<Vec2> = backend
            .dispatches()
            .iter()
            .map(|e| match e {
                Event::Dispatch { params, .. } => params.pixel_offset,
                _ => unreachable!(),
            })
            .collect();

        for o in &offsets {
            assert!(o.x >= 0.0 && o.x < 1.0 && o.y >= 0.0 && o.y < 1.0);
        }
        assert_ne!(offsets[0], offsets[1]);
    }

    #[test]
    fn test_light_packed_into_params() {
        let mut backend = RecordingBackend::new();
        let mut o = orchestrator(SceneConfig::default());
        frame(&mut o, &mut backend);

        match backend.dispatches()[0] {
            Event::Dispatch { params, .. } => {
                assert_eq!(params.directional_light.w, 0.8);
                assert_eq!(params.directional_light.truncate(), Vec3::NEG_Z);
            }
            _ => unreachable!(),
        }
    }
}
