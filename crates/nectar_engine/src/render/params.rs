//! Camera and projection parameters

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::color::Color;
use crate::foundation::math::{Point3, Vec3, Volume3, Window2};

/// Complete camera, projection and output setup for a renderer
///
/// The renderer keeps its own copy; changing a params value after handing
/// it over has no effect until it is set again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererParams {
    /// View volume in view coordinates
    pub volume: Volume3,
    /// Output window in pixels
    pub window: Window2,
    /// Camera position
    pub eye: Point3,
    /// Point the camera looks at
    pub look: Point3,
    /// Up direction
    pub up: Vec3,
    /// Distance of the projection plane; negative in front of the camera
    pub projection_distance: f64,
    /// Scene time in milliseconds handed to interpolators
    pub elapsed_ms: u64,
    /// Background, also the color fog blends toward
    pub background: Color,
}

impl Default for RendererParams {
    fn default() -> Self {
        Self {
            volume: Volume3::default(),
            window: Window2::default(),
            eye: Point3::new(0.0, 0.0, 200.0),
            look: Point3::origin(),
            up: Vec3::y(),
            projection_distance: -500.0,
            elapsed_ms: 0,
            background: Color::WHITE,
        }
    }
}

impl Config for RendererParams {}

impl RendererParams {
    /// Check that the parameters describe a usable projection
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.volume;
        if v.width() <= 0.0 || v.height() <= 0.0 || v.depth() <= 0.0 {
            return Err(ConfigError::Invalid(format!("empty view volume {v:?}")));
        }
        if self.window.width() <= 0 || self.window.height() <= 0 {
            return Err(ConfigError::Invalid(format!("empty window {:?}", self.window)));
        }
        if self.projection_distance == 0.0 || !self.projection_distance.is_finite() {
            return Err(ConfigError::Invalid("projection distance must be non-zero".into()));
        }
        let view = self.look - self.eye;
        if view.norm() <= f64::EPSILON {
            return Err(ConfigError::Invalid("eye and look points coincide".into()));
        }
        if view.cross(&self.up).norm() <= f64::EPSILON {
            return Err(ConfigError::Invalid("up vector is parallel to the view direction".into()));
        }
        Ok(())
    }

    /// Load from a TOML or RON file and validate
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let params = Self::load_from_file(path)?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        RendererParams::default().validate().unwrap();
    }

    #[test]
    fn test_degenerate_setups_rejected() {
        let mut params = RendererParams { look: Point3::new(0.0, 0.0, 200.0), ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        params = RendererParams { up: Vec3::z(), ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        params = RendererParams { projection_distance: 0.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        params = RendererParams { window: Window2::new(10, 10, 10, 40), ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let params: RendererParams = toml::from_str(
            r#"
            projection_distance = -800.0
            background = { r = 0, g = 0, b = 32 }
            "#,
        )
        .unwrap();
        assert_relative_eq!(params.projection_distance, -800.0);
        assert_eq!(params.background, Color::new(0, 0, 32));
        assert_eq!(params.window, Window2::default());
        params.validate().unwrap();
    }
}
