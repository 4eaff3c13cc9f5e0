//! Lighting environment

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::math::Vec3;

/// Directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    direction: Vec3,
    /// Light color, added to lit surfaces
    pub color: Color,
}

impl LightSource {
    /// Create a light shining along `direction`
    ///
    /// The direction is normalized; a zero vector yields a light that
    /// contributes nothing.
    pub fn new(direction: Vec3, color: Color) -> Self {
        Self {
            direction: direction.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::zeros),
            color,
        }
    }

    /// Unit direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

/// Set of lights applied to shaded layers below it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Lights in the order they are applied
    pub lights: Vec<LightSource>,
}

impl Environment {
    /// Environment with no lights
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a light
    #[must_use]
    pub fn with_light(mut self, light: LightSource) -> Self {
        self.lights.push(light);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_light_direction_is_normalized() {
        let light = LightSource::new(Vec3::new(0.0, 0.0, 3.0), Color::WHITE);
        assert_relative_eq!(light.direction(), Vec3::z());

        let dark = LightSource::new(Vec3::zeros(), Color::WHITE);
        assert_relative_eq!(dark.direction(), Vec3::zeros());
    }
}
