//! Per-frame change detection for the accumulation controller.

use crate::watch::TransformHandle;

/// What changed since the previous poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Field of view observed by this poll
    pub field_of_view: f32,
    pub field_of_view_changed: bool,
    pub transforms_changed: bool,
}

impl FrameSignals {
    /// Signals for a frame where nothing moved.
    pub fn unchanged(field_of_view: f32) -> Self {
        Self {
            field_of_view,
            field_of_view_changed: false,
            transforms_changed: false,
        }
    }

    pub fn any(&self) -> bool {
        self.field_of_view_changed || self.transforms_changed
    }
}

/// Watches a fixed set of transforms plus the camera field of view.
///
/// Polling consumes the transforms' change flags, so it must happen at
/// most once per frame and before the accumulation controller runs.
#[derive(Debug, Default)]
pub struct FrameStateTracker {
    watched: Vec<TransformHandle>,
    last_field_of_view: Option<f32>,
}

impl FrameStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform to the watch set. Registering the same handle twice
    /// is a no-op.
    pub fn register_watched(&mut self, handle: TransformHandle) {
        if self.watched.iter().any(|h| h.ptr_eq(&handle)) {
            return;
        }
        self.watched.push(handle);
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    pub fn last_field_of_view(&self) -> Option<f32> {
        self.last_field_of_view
    }

    /// Compare the field of view with the recorded one and drain every
    /// watched flag. The first poll always reports a field of view change.
    pub fn poll(&mut self, field_of_view: f32) -> FrameSignals {
        let field_of_view_changed = self.last_field_of_view != Some(field_of_view);
        self.last_field_of_view = Some(field_of_view);

        // Every flag is cleared, not just the first one found
        let mut transforms_changed = false;
        for handle in &self.watched {
            transforms_changed |= handle.take_changed();
        }

        FrameSignals {
            field_of_view,
            field_of_view_changed,
            transforms_changed,
        }
    }

    /// `poll` reduced to a single "anything changed" flag.
    pub fn poll_changes(&mut self, field_of_view: f32) -> bool {
        self.poll(field_of_view).any()
    }
}
