//! 24-bit RGB color and the channel arithmetic used by shading and fog

use serde::{Deserialize, Serialize};

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::new(255, 255, 0);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `[r, g, b]` array
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Add `other` scaled by `weight` to each channel, clamping to `[0, 255]`
    ///
    /// Negative weights darken; this is how a light facing away from a
    /// surface subtracts from its color.
    pub fn add_weighted(self, other: Self, weight: f64) -> Self {
        let channel = |a: u8, b: u8| -> u8 {
            let value = f64::from(a) + (f64::from(b) * weight).trunc();
            value.clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Blend toward `target` by `factor`, each channel clamped between the two colors
    pub fn blend_toward(self, target: Self, factor: f64) -> Self {
        let channel = |from: u8, to: u8| -> u8 {
            let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
            let value = f64::from(from) + factor * (f64::from(to) - f64::from(from));
            if value.is_nan() {
                return to;
            }
            value.trunc().clamp(f64::from(lo), f64::from(hi)) as u8
        };
        Self::new(
            channel(self.r, target.r),
            channel(self.g, target.g),
            channel(self.b, target.b),
        )
    }

    /// A brighter variant, scaling each channel by 1/0.7
    ///
    /// Channels at zero are lifted to a small floor so that black still
    /// brightens.
    pub fn brighter(self) -> Self {
        const FACTOR: f64 = 0.7;
        const FLOOR: u8 = 3;

        if self == Self::BLACK {
            return Self::new(FLOOR, FLOOR, FLOOR);
        }
        let channel = |c: u8| -> u8 {
            let c = c.max(FLOOR);
            (f64::from(c) / FACTOR).min(255.0) as u8
        };
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_weighted_clamps() {
        let base = Color::new(200, 100, 10);
        let light = Color::new(100, 100, 100);
        assert_eq!(base.add_weighted(light, 1.0), Color::new(255, 200, 110));
        assert_eq!(base.add_weighted(light, -1.0), Color::new(100, 0, 0));
    }

    #[test]
    fn test_blend_toward_stays_between_endpoints() {
        let color = Color::new(0, 100, 255);
        let background = Color::WHITE;
        assert_eq!(color.blend_toward(background, 0.0), color);
        assert_eq!(color.blend_toward(background, 5.0), background);
        assert_eq!(color.blend_toward(background, 0.5), Color::new(127, 177, 255));

        // a darker target works the same way
        assert_eq!(Color::WHITE.blend_toward(Color::BLACK, 0.25), Color::new(191, 191, 191));
    }

    #[test]
    fn test_brighter() {
        assert_eq!(Color::new(70, 0, 255).brighter(), Color::new(100, 4, 255));
        assert_eq!(Color::BLACK.brighter(), Color::new(3, 3, 3));
    }
}
