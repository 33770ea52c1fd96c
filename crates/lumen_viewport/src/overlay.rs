//! Stats and scene controls drawn over the accumulated image.

use lumen_core::{MaterialKind, Scene, SceneConfig};

/// Largest sphere count the slider offers.
const COUNT_SLIDER_MAX: u32 = 1000;

/// Read-only numbers shown in the panel.
#[derive(Clone, Debug, Default)]
pub struct OverlayStats {
    pub fps: f32,
    pub sample_count: u32,
    pub resolution: (u32, u32),
    pub field_of_view_deg: f32,
    pub object_count: usize,
    pub metal_count: usize,
    pub glass_count: usize,
    pub diffuse_count: usize,
}

impl OverlayStats {
    /// Fill the scene counts from a generated scene.
    pub fn with_scene(mut self, scene: &Scene) -> Self {
        self.object_count = scene.len();
        self.metal_count = scene.count_kind(MaterialKind::Metal);
        self.glass_count = scene.count_kind(MaterialKind::Glass);
        self.diffuse_count = scene.count_kind(MaterialKind::Diffuse);
        self
    }
}

/// What the user asked for this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayActions {
    pub regenerate: bool,
}

/// Draw the side panel. Edits land in `draft`; they only take effect when
/// the caller applies them on `regenerate`.
pub fn render_overlay(ctx: &egui::Context, stats: &OverlayStats, draft: &mut SceneConfig) -> OverlayActions {
    let mut actions = OverlayActions::default();

    egui::SidePanel::left("lumen_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Lumen");
            ui.separator();

            ui.label(format!("FPS: {:.1}", stats.fps));
            ui.label(format!("Samples: {}", stats.sample_count));
            ui.separator();

            ui.collapsing("Scene", |ui| {
                ui.label(format!("Spheres: {}", stats.object_count));
                ui.label(format!("Metal: {}", stats.metal_count));
                ui.label(format!("Glass: {}", stats.glass_count));
                ui.label(format!("Diffuse: {}", stats.diffuse_count));
            });

            ui.collapsing("Viewport", |ui| {
                ui.label(format!("Resolution: {}x{}", stats.resolution.0, stats.resolution.1));
                ui.label(format!("FOV: {:.1}°", stats.field_of_view_deg));
            });

            ui.separator();

            ui.collapsing("Generation", |ui| {
                ui.add(egui::Slider::new(&mut draft.radius_range.min, 0.1..=20.0).text("Min radius"));
                ui.add(egui::Slider::new(&mut draft.radius_range.max, 0.1..=20.0).text("Max radius"));
                ui.add(egui::Slider::new(&mut draft.count_max, 0..=COUNT_SLIDER_MAX).text("Count max"));
                ui.add(egui::Slider::new(&mut draft.placement_radius, 0.0..=500.0).text("Placement radius"));

                if let Err(e) = draft.validate() {
                    ui.colored_label(egui::Color32::YELLOW, e.to_string());
                }

                if ui.button("Regenerate").clicked() {
                    actions.regenerate = true;
                }
            });

            ui.separator();

            ui.collapsing("Controls", |ui| {
                ui.label("Left Mouse: Orbit");
                ui.label("Scroll Wheel: Field of view");
                ui.label("Arrow Keys: Rotate light");
                ui.label("R: Regenerate scene");
                ui.label("H: Toggle panel");
            });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::SceneGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stats_from_scene() {
        let mut rng = StdRng::seed_from_u64(3);
        let scene = SceneGenerator::new(SceneConfig::default()).generate(&mut rng);

        let stats = OverlayStats::default().with_scene(&scene);

        assert_eq!(stats.object_count, scene.len());
        assert_eq!(stats.metal_count, scene.count_kind(MaterialKind::Metal));
        assert_eq!(stats.metal_count + stats.glass_count + stats.diffuse_count, scene.len());
    }

    #[test]
    fn test_headless_frame_has_no_actions() {
        let ctx = egui::Context::default();
        let mut draft = SceneConfig::default();
        let stats = OverlayStats::default();

        let mut actions = OverlayActions::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = render_overlay(ctx, &stats, &mut draft);
        });

        assert_eq!(actions, OverlayActions::default());
        assert_eq!(draft, SceneConfig::default());
    }
}
