//! Lumen Core - CPU-side orchestration for a progressive GPU renderer.
//!
//! This crate provides:
//!
//! - **Scene population**: rejection-sampled, non-overlapping spheres with
//!   a Metal / Glass / Diffuse material taxonomy (`SceneGenerator`)
//! - **Change tracking**: edge-triggered watched transforms and field of
//!   view polling (`FrameStateTracker`)
//! - **Progressive accumulation**: the invalidation state machine that
//!   decides when to discard samples and reallocate the accumulation
//!   target (`AccumulationController`)
//! - **Frame driving**: the per-frame sequence that feeds a
//!   `RenderBackend` (`FrameOrchestrator`)
//!
//! The GPU kernel, windowing and presentation live behind the
//! `RenderBackend` trait.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{FrameOrchestrator, FrameInputs, SceneConfig};
//!
//! let mut orchestrator = FrameOrchestrator::new(SceneConfig::default(), camera, light, None);
//! orchestrator.enable();
//! loop {
//!     orchestrator.render_frame(&mut backend, &FrameInputs::new((1280, 720), lens))?;
//! }
//! ```

pub mod accumulation;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod material;
pub mod orchestrator;
pub mod scene;
pub mod tracker;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use accumulation::{AccumulationController, AccumulationState, Invalidations};
pub use backend::{DirectionalLight, KernelParams, RenderBackend};
pub use config::SceneConfig;
pub use dispatch::{DispatchGrid, KERNEL_TILE_SIZE};
pub use error::{ConfigError, RenderError, RenderResult, ResourceKind};
pub use material::{MaterialKind, Surface, DIELECTRIC_SPECULAR};
pub use orchestrator::{FrameInputs, FrameOrchestrator, FrameReport};
pub use scene::{PlacedObject, Scene, SceneGenerator};
pub use tracker::{FrameSignals, FrameStateTracker};
pub use watch::TransformHandle;
