//! CPU backend that records every call, for tests.

use std::collections::HashMap;

use lumen_math::Color;

use crate::backend::{KernelParams, RenderBackend};
use crate::dispatch::DispatchGrid;
use crate::error::{RenderError, RenderResult, ResourceKind};
use crate::scene::PlacedObject;

/// Host-side image standing in for a GPU texture.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl CpuImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// `mix(self, sample, weight)` per pixel, as the composite pass does.
    /// Weight 1 overwrites instead of mixing.
    pub fn blend(&mut self, sample: &CpuImage, weight: f32) {
        assert_eq!((self.width, self.height), (sample.width, sample.height));
        for (dst, src) in self.pixels.iter_mut().zip(&sample.pixels) {
            *dst = if weight >= 1.0 { *src } else { dst.lerp(*src, weight) };
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AllocateTarget { id: u64, width: u32, height: u32 },
    ReleaseTarget { id: u64 },
    UploadScene { id: u64, len: usize },
    ReleaseScene { id: u64 },
    Dispatch {
        target: u64,
        scene: Option<u64>,
        grid: DispatchGrid,
        params: KernelParams,
    },
    Composite { target: u64, weight: f32 },
    Present { target: u64 },
}

#[derive(Debug)]
pub struct CpuTarget {
    id: u64,
}

#[derive(Debug)]
pub struct CpuSceneBuffer {
    id: u64,
}

struct TargetImages {
    accumulation: CpuImage,
    sample: CpuImage,
}

pub struct RecordingBackend {
    next_id: u64,
    events: Vec<Event>,
    targets: HashMap<u64, TargetImages>,
    scenes: HashMap<u64, usize>,
    fail_target: bool,
    fail_scene: bool,
    sample_color: Color,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            events: Vec::new(),
            targets: HashMap::new(),
            scenes: HashMap::new(),
            fail_target: false,
            fail_scene: false,
            sample_color: Color::ONE,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn live_scenes(&self) -> usize {
        self.scenes.len()
    }

    pub fn target_size(&self, target: &CpuTarget) -> (u32, u32) {
        let images = &self.targets[&target.id];
        (images.accumulation.width, images.accumulation.height)
    }

    pub fn accumulation(&self, target: &CpuTarget) -> &CpuImage {
        &self.targets[&target.id].accumulation
    }

    /// Value the next dispatched samples are filled with.
    pub fn set_sample_color(&mut self, color: Color) {
        self.sample_color = color;
    }

    pub fn fail_next_target_allocation(&mut self) {
        self.fail_target = true;
    }

    pub fn fail_next_scene_upload(&mut self) {
        self.fail_scene = true;
    }

    pub fn dispatches(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Dispatch { .. }))
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Target = CpuTarget;
    type SceneBuffer = CpuSceneBuffer;

    fn allocate_target(&mut self, width: u32, height: u32) -> RenderResult<CpuTarget> {
        if std::mem::take(&mut self.fail_target) {
            return Err(RenderError::allocation(ResourceKind::AccumulationTarget, "simulated"));
        }
        let id = self.next_id();
        self.targets.insert(
            id,
            TargetImages {
                accumulation: CpuImage::new(width, height),
                sample: CpuImage::new(width, height),
            },
        );
        self.events.push(Event::AllocateTarget { id, width, height });
        Ok(CpuTarget { id })
    }

    fn release_target(&mut self, target: CpuTarget) {
        assert!(self.targets.remove(&target.id).is_some(), "double release");
        self.events.push(Event::ReleaseTarget { id: target.id });
    }

    fn upload_scene(&mut self, objects: &[PlacedObject]) -> RenderResult<CpuSceneBuffer> {
        assert!(!objects.is_empty(), "empty scenes must not be uploaded");
        if std::mem::take(&mut self.fail_scene) {
            return Err(RenderError::allocation(ResourceKind::SceneBuffer, "simulated"));
        }
        let id = self.next_id();
        self.scenes.insert(id, objects.len());
        self.events.push(Event::UploadScene {
            id,
            len: objects.len(),
        });
        Ok(CpuSceneBuffer { id })
    }

    fn release_scene(&mut self, buffer: CpuSceneBuffer) {
        assert!(self.scenes.remove(&buffer.id).is_some(), "double release");
        self.events.push(Event::ReleaseScene { id: buffer.id });
    }

    fn dispatch(
        &mut self,
        params: &KernelParams,
        scene: Option<&CpuSceneBuffer>,
        target: &CpuTarget,
        grid: DispatchGrid,
    ) -> RenderResult<()> {
        if let Some(scene) = scene {
            assert_eq!(self.scenes.get(&scene.id).copied(), Some(params.object_count as usize));
        } else {
            assert_eq!(params.object_count, 0);
        }

        let color = self.sample_color;
        let images = self.targets.get_mut(&target.id).expect("dispatch on released target");
        let (w, h) = grid.covered_extent();
        assert!(w >= images.sample.width && h >= images.sample.height);
        images.sample.fill(color);

        self.events.push(Event::Dispatch {
            target: target.id,
            scene: scene.map(|s| s.id),
            grid,
            params: *params,
        });
        Ok(())
    }

    fn composite(&mut self, target: &CpuTarget, weight: f32) -> RenderResult<()> {
        let images = self.targets.get_mut(&target.id).expect("composite on released target");
        let sample = images.sample.clone();
        images.accumulation.blend(&sample, weight);
        self.events.push(Event::Composite {
            target: target.id,
            weight,
        });
        Ok(())
    }

    fn present(&mut self, target: &CpuTarget) -> RenderResult<()> {
        assert!(self.targets.contains_key(&target.id), "present on released target");
        self.events.push(Event::Present { target: target.id });
        Ok(())
    }
}
