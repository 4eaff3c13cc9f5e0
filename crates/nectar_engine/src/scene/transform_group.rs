//! Transform groups and the attribute-group capability
//!
//! A [`TransformGroup`] stores nine numeric attributes (rotation, scale and
//! translation components) independently of which transform kinds it
//! applies. Kinds are applied in the order they were added, each one acting
//! on the result of the previous, so `[Translate, RotY]` swings a translated
//! point around the Y axis while `[RotY, Translate]` rotates in place and then
//! moves.

use serde::{Deserialize, Serialize};

use super::error::SceneError;
use crate::foundation::math::{Mat4, Mat4Ext};

/// Transform kinds a group can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// Rotation about X by [`Attribute::RotX`] degrees
    RotX,
    /// Rotation about Y by [`Attribute::RotY`] degrees
    RotY,
    /// Rotation about Z by [`Attribute::RotZ`] degrees
    RotZ,
    /// Translation by the three translate attributes
    Translate,
    /// Scale by the three scale attributes
    Scale,
}

impl TransformKind {
    /// Every transform kind
    pub const ALL: [Self; 5] = [Self::RotX, Self::RotY, Self::RotZ, Self::Translate, Self::Scale];

    /// Matrix for this kind using the attribute values in `attributes`
    pub fn matrix(self, attributes: &impl AttributeGroup) -> Mat4 {
        let a = |attribute| attributes.attribute(attribute);
        match self {
            Self::RotX => Mat4::rotation_x_degrees(a(Attribute::RotX)),
            Self::RotY => Mat4::rotation_y_degrees(a(Attribute::RotY)),
            Self::RotZ => Mat4::rotation_z_degrees(a(Attribute::RotZ)),
            Self::Translate => Mat4::translation(
                a(Attribute::TranslateX),
                a(Attribute::TranslateY),
                a(Attribute::TranslateZ),
            ),
            Self::Scale => Mat4::scaling(a(Attribute::ScaleX), a(Attribute::ScaleY), a(Attribute::ScaleZ)),
        }
    }
}

/// Addressable numeric attributes of a transform group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Rotation about X, degrees
    RotX,
    /// Rotation about Y, degrees
    RotY,
    /// Rotation about Z, degrees
    RotZ,
    /// Scale along X
    ScaleX,
    /// Scale along Y
    ScaleY,
    /// Scale along Z
    ScaleZ,
    /// Translation along X
    TranslateX,
    /// Translation along Y
    TranslateY,
    /// Translation along Z
    TranslateZ,
}

impl Attribute {
    /// Number of attributes
    pub const COUNT: usize = 9;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Capability of a scene node to expose numeric attributes by id
///
/// Interpolators animate their parent through this trait; parents that do
/// not implement it are left alone.
pub trait AttributeGroup {
    /// Set an attribute value
    fn set_attribute(&mut self, attribute: Attribute, value: f64);

    /// Read an attribute value
    fn attribute(&self, attribute: Attribute) -> f64;
}

/// Ordered set of transforms applied to a subtree
#[derive(Debug, Clone, PartialEq)]
pub struct TransformGroup {
    transforms: Vec<TransformKind>,
    attributes: [f64; Attribute::COUNT],
}

impl TransformGroup {
    /// Maximum number of transform kinds per group
    pub const MAX_TRANSFORMS: usize = 5;

    /// Create a group with no transforms, unit scale and zero rotation/translation
    pub fn new() -> Self {
        let mut attributes = [0.0; Attribute::COUNT];
        attributes[Attribute::ScaleX.index()] = 1.0;
        attributes[Attribute::ScaleY.index()] = 1.0;
        attributes[Attribute::ScaleZ.index()] = 1.0;
        Self {
            transforms: Vec::with_capacity(Self::MAX_TRANSFORMS),
            attributes,
        }
    }

    /// Append a transform kind
    ///
    /// Fails if the kind is already present or the group is full. The
    /// attribute values backing the kind are not touched.
    pub fn add_transform(&mut self, kind: TransformKind) -> Result<(), SceneError> {
        if self.contains_transform(kind) {
            return Err(SceneError::DuplicateTransform(kind));
        }
        if self.transforms.len() >= Self::MAX_TRANSFORMS {
            return Err(SceneError::TooManyTransforms { max: Self::MAX_TRANSFORMS });
        }
        self.transforms.push(kind);
        Ok(())
    }

    /// Builder-style [`add_transform`](Self::add_transform)
    pub fn with_transform(mut self, kind: TransformKind) -> Result<Self, SceneError> {
        self.add_transform(kind)?;
        Ok(self)
    }

    /// Builder-style [`set_attribute`](AttributeGroup::set_attribute)
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute, value: f64) -> Self {
        self.set_attribute(attribute, value);
        self
    }

    /// Remove every transform kind, keeping attribute values
    pub fn clear_transforms(&mut self) {
        self.transforms.clear();
    }

    /// Whether `kind` has been added
    pub fn contains_transform(&self, kind: TransformKind) -> bool {
        self.transforms.contains(&kind)
    }

    /// Transform kinds in the order they were added
    pub fn transforms(&self) -> &[TransformKind] {
        &self.transforms
    }

    /// Combined matrix of every added kind, first-added applied first
    pub fn local_matrix(&self) -> Mat4 {
        self.transforms
            .iter()
            .fold(Mat4::identity(), |acc, kind| kind.matrix(self) * acc)
    }
}

impl Default for TransformGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeGroup for TransformGroup {
    fn set_attribute(&mut self, attribute: Attribute, value: f64) {
        self.attributes[attribute.index()] = value;
    }

    fn attribute(&self, attribute: Attribute) -> f64 {
        self.attributes[attribute.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_duplicate_and_capacity() {
        let mut group = TransformGroup::new();
        for kind in TransformKind::ALL {
            group.add_transform(kind).unwrap();
        }
        assert_eq!(
            group.add_transform(TransformKind::RotY),
            Err(SceneError::DuplicateTransform(TransformKind::RotY))
        );
        assert_eq!(group.transforms(), &TransformKind::ALL);

        group.clear_transforms();
        group.add_transform(TransformKind::Scale).unwrap();
        assert_eq!(
            group.add_transform(TransformKind::Scale),
            Err(SceneError::DuplicateTransform(TransformKind::Scale))
        );
    }

    #[test]
    fn test_attributes_are_independent_of_added_kinds() {
        let mut group = TransformGroup::new();
        group.set_attribute(Attribute::TranslateX, 12.0);
        assert_relative_eq!(group.attribute(Attribute::TranslateX), 12.0);
        assert_relative_eq!(group.attribute(Attribute::ScaleY), 1.0);

        group.add_transform(TransformKind::Translate).unwrap();
        assert_relative_eq!(group.attribute(Attribute::TranslateX), 12.0);

        // nothing added for rotation, so the matrix ignores RotZ
        group.set_attribute(Attribute::RotZ, 90.0);
        let p = group.local_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p, Vec4::new(12.0, 0.0, 0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_kinds_apply_in_addition_order() {
        let translate_then_rotate = TransformGroup::new()
            .with_transform(TransformKind::Translate)
            .and_then(|g| g.with_transform(TransformKind::RotY))
            .unwrap()
            .with_attribute(Attribute::TranslateX, 10.0)
            .with_attribute(Attribute::RotY, 90.0);
        let rotate_then_translate = TransformGroup::new()
            .with_transform(TransformKind::RotY)
            .and_then(|g| g.with_transform(TransformKind::Translate))
            .unwrap()
            .with_attribute(Attribute::TranslateX, 10.0)
            .with_attribute(Attribute::RotY, 90.0);

        let origin = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let a = translate_then_rotate.local_matrix() * origin;
        let b = rotate_then_translate.local_matrix() * origin;
        assert_relative_eq!(a, Vec4::new(0.0, 0.0, -10.0, 1.0), epsilon = 1e-9);
        assert_relative_eq!(b, Vec4::new(10.0, 0.0, 0.0, 1.0), epsilon = 1e-9);
    }
}
