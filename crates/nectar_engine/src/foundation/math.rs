//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph and the
//! software view pipeline. All scene math is done in `f64`; window
//! coordinates are integer pixels.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4D (homogeneous) vector type
pub type Vec4 = Vector4<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Integer window coordinate in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal pixel coordinate
    pub x: i32,
    /// Vertical pixel coordinate
    pub y: i32,
}

impl Point2 {
    /// Create a new window coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned view volume in view coordinates
///
/// `zmin`/`zmax` are view-space depths; with the camera looking down the
/// decreasing Z axis both are normally negative, `zmax` being the near plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume3 {
    /// Left extent
    pub xmin: f64,
    /// Bottom extent
    pub ymin: f64,
    /// Far extent
    pub zmin: f64,
    /// Right extent
    pub xmax: f64,
    /// Top extent
    pub ymax: f64,
    /// Near extent
    pub zmax: f64,
}

impl Volume3 {
    /// Create a volume from its minimum and maximum corners
    pub const fn new(xmin: f64, ymin: f64, zmin: f64, xmax: f64, ymax: f64, zmax: f64) -> Self {
        Self { xmin, ymin, zmin, xmax, ymax, zmax }
    }

    /// Extent along X
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Extent along Y
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Extent along Z
    pub fn depth(&self) -> f64 {
        self.zmax - self.zmin
    }
}

impl Default for Volume3 {
    fn default() -> Self {
        Self::new(-200.0, -200.0, -300.0, 200.0, 200.0, -100.0)
    }
}

/// Device window rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window2 {
    /// Left edge
    pub xmin: i32,
    /// Top edge
    pub ymin: i32,
    /// Right edge
    pub xmax: i32,
    /// Bottom edge
    pub ymax: i32,
}

impl Window2 {
    /// Create a window rectangle
    pub const fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    /// Width in pixels
    pub const fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    /// Height in pixels
    pub const fn height(&self) -> i32 {
        self.ymax - self.ymin
    }
}

impl Default for Window2 {
    fn default() -> Self {
        Self::new(0, 0, 800, 800)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle in degrees into `[0, 360]`
    pub fn wrap_degrees(degrees: f64) -> f64 {
        if degrees < 0.0 {
            360.0 - (degrees.abs() % 360.0)
        } else if degrees > 360.0 {
            degrees % 360.0
        } else {
            degrees
        }
    }

    /// Linear interpolation
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat4 with the transforms the view pipeline composes
///
/// All rotations take angles in degrees, matching how scene attributes are
/// authored. Matrices follow nalgebra's column-vector convention
/// (`p' = M * p`).
pub trait Mat4Ext {
    /// Rotation about the X axis
    fn rotation_x_degrees(angle: f64) -> Mat4;

    /// Rotation about the Y axis
    fn rotation_y_degrees(angle: f64) -> Mat4;

    /// Rotation about the Z axis
    fn rotation_z_degrees(angle: f64) -> Mat4;

    /// Translation by `(x, y, z)`
    fn translation(x: f64, y: f64, z: f64) -> Mat4;

    /// Non-uniform scale by `(x, y, z)`
    fn scaling(x: f64, y: f64, z: f64) -> Mat4;

    /// Right-handed look-at view matrix
    ///
    /// Translates by `-eye` then rotates into the camera basis so that the
    /// camera looks down the decreasing Z axis.
    fn look_at(eye: &Point3, look: &Point3, up: &Vec3) -> Mat4;

    /// Perspective-divide setup for a projection plane at distance `d`
    ///
    /// Leaves X, Y and Z untouched and produces `w' = w + z / d`, so that the
    /// window mapping divides X and Y by `w` while Z stays usable as depth.
    fn perspective_divide(distance: f64) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x_degrees(angle: f64) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), utils::deg_to_rad(utils::wrap_degrees(angle)))
    }

    fn rotation_y_degrees(angle: f64) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(utils::wrap_degrees(angle)))
    }

    fn rotation_z_degrees(angle: f64) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(utils::wrap_degrees(angle)))
    }

    fn translation(x: f64, y: f64, z: f64) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn scaling(x: f64, y: f64, z: f64) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }

    fn look_at(eye: &Point3, look: &Point3, up: &Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, look, up)
    }

    fn perspective_divide(distance: f64) -> Mat4 {
        let mut result = Mat4::identity();
        result[(3, 2)] = 1.0 / distance;
        result
    }
}
