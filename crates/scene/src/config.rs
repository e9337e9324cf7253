use reveal_scroll::ScrollConfig;
use reveal_timeline::Ease;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Perspective camera parked on +Z looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the camera to the z = 0 plane, in pixels.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 600.0,
            near: 10.0,
            far: 1000.0,
        }
    }
}

/// Corner reveal: four overlapping tweens, one per corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Length of each corner tween.
    pub duration: f32,
    /// Offset between consecutive corner tweens.
    pub stagger: f32,
    pub ease: Ease,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            stagger: 0.1,
            ease: Ease::Linear,
        }
    }
}

/// Horizontal gallery strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub rows: u32,
    /// Height of the whole strip as a fraction of the viewport height.
    pub item_height: f32,
    /// Space between items, in pixels.
    pub gap: f32,
    /// Space before the first and after the last column, in pixels.
    pub padding: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            item_height: 0.5,
            gap: 40.0,
            padding: 80.0,
        }
    }
}

/// Optional spinning sample plane, not bound to any image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub enabled: bool,
    pub size: f32,
    pub offset_x: f32,
    /// Radians of X rotation per unit of accumulated time.
    pub rate_x: f32,
    /// Radians of Y rotation per unit of accumulated time.
    pub rate_y: f32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 300.0,
            offset_x: 300.0,
            rate_x: 1.0 / 2000.0,
            rate_y: 1.0 / 1000.0,
        }
    }
}

/// Full scene configuration. Every field has a default, so partial files load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Amount added to the time accumulator every tick.
    pub time_step: f32,
    pub camera: CameraConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub gallery: GalleryConfig,
    pub decoration: DecorationConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            time_step: 0.05,
            camera: CameraConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            gallery: GalleryConfig::default(),
            decoration: DecorationConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };
        if !self.time_step.is_finite() {
            return invalid("time_step must be finite");
        }
        if !(self.camera.distance > 0.0) {
            return invalid("camera.distance must be positive");
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid("camera.near must be positive and below camera.far");
        }
        if !(self.scroll.ease > 0.0 && self.scroll.ease <= 1.0) {
            return invalid("scroll.ease must be in (0, 1]");
        }
        if !(self.reveal.duration >= 0.0 && self.reveal.stagger >= 0.0) {
            return invalid("reveal.duration and reveal.stagger must be non-negative");
        }
        if self.gallery.rows == 0 {
            return invalid("gallery.rows must be at least 1");
        }
        if !(self.gallery.item_height > 0.0 && self.gallery.item_height <= 1.0) {
            return invalid("gallery.item_height must be in (0, 1]");
        }
        if !(self.gallery.gap >= 0.0 && self.gallery.padding >= 0.0) {
            return invalid("gallery.gap and gallery.padding must be non-negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.distance, 600.0);
        assert_eq!(config.time_step, 0.05);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "gallery:\n  rows: 2\nreveal:\n  ease: power1_out").unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.gallery.rows, 2);
        assert_eq!(config.gallery.gap, 40.0);
        assert_eq!(config.reveal.ease, Ease::Power1Out);
        assert_eq!(config.reveal.duration, 1.0);
    }

    #[test]
    fn json_config_loads() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"time_step": 0.1, "decoration": {{"enabled": true}}}}"#).unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.time_step, 0.1);
        assert!(config.decoration.enabled);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            SceneConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = SceneConfig::default();
        config.gallery.rows = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.camera.near = 2000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let config = SceneConfig::default();
        let text = config.to_yaml().unwrap();
        let back: SceneConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
