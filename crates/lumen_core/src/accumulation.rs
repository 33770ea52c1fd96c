//! Progressive accumulation state machine.
//!
//! The controller is always in `Accumulating(n)`: `n` samples have been
//! averaged into the target since the last invalidation. Each frame it
//! checks, in order:
//!
//! 1. viewport size differs from the target → release, reallocate, reset
//! 2. field of view changed → reset
//! 3. a watched transform moved → reset
//! 4. scene (re)initialization requested → reset and regenerate the scene
//!
//! Every condition is evaluated even when an earlier one fired. With no
//! invalidation the count grows by one after each composited sample.

use crate::backend::RenderBackend;
use crate::error::{RenderError, RenderResult};
use crate::tracker::FrameSignals;

/// Observable accumulation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccumulationState {
    pub sample_count: u32,
    pub target_width: u32,
    pub target_height: u32,
    pub last_field_of_view: f32,
}

/// Which invalidation conditions fired this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidations {
    pub resized: bool,
    pub field_of_view: bool,
    pub transform: bool,
    pub scene: bool,
}

impl Invalidations {
    pub fn any(&self) -> bool {
        self.resized || self.field_of_view || self.transform || self.scene
    }

    /// Name of the highest-priority condition that fired.
    pub fn primary(&self) -> Option<&'static str> {
        if self.resized {
            Some("viewport resized")
        } else if self.field_of_view {
            Some("field of view changed")
        } else if self.transform {
            Some("watched transform moved")
        } else if self.scene {
            Some("scene reinitialized")
        } else {
            None
        }
    }
}

/// Owns the sample counter and the accumulation target.
///
/// Lifecycle: `enable` starts a session (counter reset, scene
/// regeneration scheduled); `disable` ends it and releases the target.
pub struct AccumulationController<B: RenderBackend> {
    target: Option<B::Target>,
    state: AccumulationState,
    scene_reinit_pending: bool,
}

impl<B: RenderBackend> AccumulationController<B> {
    pub fn new() -> Self {
        Self {
            target: None,
            state: AccumulationState::default(),
            scene_reinit_pending: false,
        }
    }

    pub fn state(&self) -> &AccumulationState {
        &self.state
    }

    pub fn sample_count(&self) -> u32 {
        self.state.sample_count
    }

    pub fn target(&self) -> Option<&B::Target> {
        self.target.as_ref()
    }

    /// Start a session: reset the counter and schedule scene generation.
    pub fn enable(&mut self) {
        self.state.sample_count = 0;
        self.scene_reinit_pending = true;
    }

    /// End a session, releasing the accumulation target.
    pub fn disable(&mut self, backend: &mut B) {
        if let Some(old) = self.target.take() {
            backend.release_target(old);
            log::info!(
                "Released {}x{} accumulation target",
                self.state.target_width,
                self.state.target_height
            );
        }
        self.state.target_width = 0;
        self.state.target_height = 0;
        self.state.sample_count = 0;
        self.scene_reinit_pending = false;
    }

    /// Ask for a scene rebuild on the next frame (transition 4).
    pub fn request_scene_reinit(&mut self) {
        self.scene_reinit_pending = true;
    }

    pub fn scene_reinit_pending(&self) -> bool {
        self.scene_reinit_pending
    }

    fn reset(&mut self) {
        self.state.sample_count = 0;
    }

    /// Run the four transition checks for this frame.
    ///
    /// `signals` must come from this frame's `FrameStateTracker::poll`.
    /// On allocation failure the old target is already gone and the error
    /// is returned after the remaining checks have been applied, so the
    /// polled field of view is recorded either way. The next frame sees no
    /// target and allocates again.
    pub fn reconcile(
        &mut self,
        backend: &mut B,
        viewport: (u32, u32),
        signals: &FrameSignals,
    ) -> RenderResult<Invalidations> {
        let mut fired = Invalidations::default();
        let (width, height) = viewport;

        // 1. Release-then-allocate; nothing is dispatched in between
        let size_matches = self.state.target_width == width && self.state.target_height == height;
        let allocation = if self.target.is_none() || !size_matches {
            if let Some(old) = self.target.take() {
                backend.release_target(old);
            }
            self.state.target_width = 0;
            self.state.target_height = 0;
            self.reset();
            Some(backend.allocate_target(width, height))
        } else {
            None
        };

        // 2.
        if signals.field_of_view_changed {
            self.state.last_field_of_view = signals.field_of_view;
            self.reset();
            fired.field_of_view = true;
        }

        // 3. The tracker already cleared the flags when it polled
        if signals.transforms_changed {
            self.reset();
            fired.transform = true;
        }

        // 4.
        if self.scene_reinit_pending {
            self.scene_reinit_pending = false;
            self.reset();
            fired.scene = true;
        }

        if let Some(allocation) = allocation {
            self.target = Some(allocation?);
            self.state.target_width = width;
            self.state.target_height = height;
            fired.resized = true;
            log::info!("Allocated {}x{} accumulation target", width, height);
        }

        if let Some(reason) = fired.primary() {
            log::debug!("Accumulation reset: {}", reason);
        }

        Ok(fired)
    }

    /// Weight of the incoming sample: `1 / (n + 1)`.
    pub fn blend_weight(&self) -> f32 {
        1.0 / (self.state.sample_count as f32 + 1.0)
    }

    /// The target to render into this frame.
    pub fn current_target(&self) -> RenderResult<&B::Target> {
        self.target.as_ref().ok_or(RenderError::TargetMissing)
    }

    /// Count the sample that was just composited.
    pub fn advance(&mut self) {
        self.state.sample_count = self.state.sample_count.saturating_add(1);
    }
}

impl<B: RenderBackend> Default for AccumulationController<B> {
    fn default() -> Self {
        Self::new()
    }
}
