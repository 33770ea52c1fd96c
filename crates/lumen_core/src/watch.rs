//! Shared transforms with an edge-triggered change flag.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use lumen_math::Transform;

struct Watched {
    transform: Cell<Transform>,
    changed: Cell<bool>,
}

/// A pose shared between whoever moves it (input handling) and whoever
/// watches it (`FrameStateTracker`).
///
/// Every write sets the changed flag; the flag stays set until someone
/// consumes it with `take_changed`. Clones refer to the same pose.
#[derive(Clone)]
pub struct TransformHandle {
    inner: Rc<Watched>,
}

impl TransformHandle {
    /// Create a handle whose flag starts cleared.
    pub fn new(transform: Transform) -> Self {
        Self {
            inner: Rc::new(Watched {
                transform: Cell::new(transform),
                changed: Cell::new(false),
            }),
        }
    }

    pub fn get(&self) -> Transform {
        self.inner.transform.get()
    }

    /// Replace the pose and raise the changed flag.
    pub fn set(&self, transform: Transform) {
        self.inner.transform.set(transform);
        self.inner.changed.set(true);
    }

    /// Modify the pose in place and raise the changed flag.
    pub fn update(&self, f: impl FnOnce(&mut Transform)) {
        let mut transform = self.get();
        f(&mut transform);
        self.set(transform);
    }

    pub fn has_changed(&self) -> bool {
        self.inner.changed.get()
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&self) -> bool {
        self.inner.changed.replace(false)
    }

    /// True if both handles refer to the same pose.
    pub fn ptr_eq(&self, other: &TransformHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for TransformHandle {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl fmt::Debug for TransformHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformHandle")
            .field("transform", &self.get())
            .field("changed", &self.has_changed())
            .finish()
    }
}
