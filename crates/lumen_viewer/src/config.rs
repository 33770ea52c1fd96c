//! Viewer settings loaded from a JSON file.

use std::path::{Path, PathBuf};

use lumen_core::{ConfigError, SceneConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading viewer settings.
#[derive(Error, Debug)]
pub enum ViewerConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene settings: {0}")]
    Scene(#[from] ConfigError),

    #[error("Window size must be non-zero, got {width}x{height}")]
    WindowSize { width: u32, height: u32 },

    #[error("Field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
}

/// Directional light orientation and strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightConfig {
    pub intensity: f32,
    pub yaw_degrees: f32,
    /// Negative points the light downwards
    pub pitch_degrees: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            yaw_degrees: 30.0,
            pitch_degrees: -50.0,
        }
    }
}

/// Initial orbit camera placement around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    pub distance: f32,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub field_of_view: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 220.0,
            yaw_degrees: 0.0,
            pitch_degrees: 25.0,
            field_of_view: 60.0,
        }
    }
}

/// Everything the viewer reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Fixed seed for reproducible scenes; random when absent
    pub seed: Option<u64>,
    /// Equirectangular sky image; procedural gradient when absent
    pub skybox: Option<PathBuf>,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub scene: SceneConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            seed: None,
            skybox: None,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ViewerConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ViewerConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ViewerConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ViewerConfigError::WindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }

        let fov = self.camera.field_of_view;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ViewerConfigError::FieldOfView(fov));
        }

        self.scene.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let json = r#"{
            "seed": 42,
            "skybox": "assets/sky.jpg",
            "light": { "intensity": 2.0 },
            "scene": { "countMax": 25, "radiusRange": { "min": 1.0, "max": 2.0 } }
        }"#;

        let config = ViewerConfig::from_json(json).unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.skybox.as_deref(), Some(Path::new("assets/sky.jpg")));
        assert_eq!(config.light.intensity, 2.0);
        assert_eq!(config.light.pitch_degrees, LightConfig::default().pitch_degrees);
        assert_eq!(config.scene.count_max, 25);
        assert_eq!(config.scene.radius_range.max, 2.0);
        assert_eq!(config.scene.placement_radius, 100.0);
    }

    #[test]
    fn test_invalid_scene_rejected() {
        let json = r#"{ "scene": { "radiusRange": { "min": 5.0, "max": 1.0 } } }"#;
        let err = ViewerConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ViewerConfigError::Scene(ConfigError::InvalidRadiusRange { .. })));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let err = ViewerConfig::from_json(r#"{ "windowWidth": 0 }"#).unwrap_err();
        assert!(matches!(err, ViewerConfigError::WindowSize { width: 0, .. }));
    }

    #[test]
    fn test_invalid_fov_rejected() {
        let err = ViewerConfig::from_json(r#"{ "camera": { "fieldOfView": 180.0 } }"#).unwrap_err();
        assert!(matches!(err, ViewerConfigError::FieldOfView(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ViewerConfig::from_json("{ not json"),
            Err(ViewerConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load(Path::new("no/such/lumen.json")).unwrap_err();
        assert!(matches!(err, ViewerConfigError::Io(_)));
    }
}
