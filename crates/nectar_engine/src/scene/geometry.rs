//! Polygonal geometry
//!
//! A [`Geometry`] is a vertex array plus faces that index into it. Faces are
//! wound counter-clockwise when seen from outside, which is what backface
//! culling relies on.

use serde::{Deserialize, Serialize};

use super::error::SceneError;
use crate::foundation::math::Point3;

/// An ordered polygon of vertex indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices, at least three
    pub vertices: Vec<usize>,
}

impl Face {
    /// Create a face from vertex indices
    pub fn new(vertices: impl Into<Vec<usize>>) -> Self {
        Self { vertices: vertices.into() }
    }
}

/// Vertices and the faces built from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    vertices: Vec<Point3>,
    faces: Vec<Face>,
}

impl Geometry {
    /// Face of a cuboid facing +Z
    pub const ZMAX_FACE: usize = 0;
    /// Face of a cuboid facing +X
    pub const XMAX_FACE: usize = 1;
    /// Face of a cuboid facing +Y
    pub const YMAX_FACE: usize = 2;
    /// Face of a cuboid facing -X
    pub const XMIN_FACE: usize = 3;
    /// Face of a cuboid facing -Y
    pub const YMIN_FACE: usize = 4;
    /// Face of a cuboid facing -Z
    pub const ZMIN_FACE: usize = 5;

    /// Build geometry, checking every face
    pub fn new(vertices: Vec<Point3>, faces: Vec<Face>) -> Result<Self, SceneError> {
        for (index, face) in faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(SceneError::FaceTooSmall { face: index, count: face.vertices.len() });
            }
            if let Some(&vertex) = face.vertices.iter().find(|&&v| v >= vertices.len()) {
                return Err(SceneError::FaceVertexOutOfRange {
                    face: index,
                    vertex,
                    count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Axis-aligned box centered on the origin
    ///
    /// The sizes are half extents: corners sit at `(±x, ±y, ±z)`. Face
    /// indices are given by the `*_FACE` constants.
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        const CORNERS: [[f64; 3]; 8] = [
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
        ];
        const FACES: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [0, 3, 7, 4],
            [0, 4, 5, 1],
            [1, 5, 6, 2],
            [2, 6, 7, 3],
            [5, 4, 7, 6],
        ];

        Self {
            vertices: CORNERS
                .iter()
                .map(|[cx, cy, cz]| Point3::new(cx * x, cy * y, cz * z))
                .collect(),
            faces: FACES.iter().map(|face| Face::new(face.to_vec())).collect(),
        }
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_validation() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert!(Geometry::new(vertices.clone(), vec![Face::new([0, 1, 2])]).is_ok());
        assert_eq!(
            Geometry::new(vertices.clone(), vec![Face::new([0, 1])]),
            Err(SceneError::FaceTooSmall { face: 0, count: 2 })
        );
        assert_eq!(
            Geometry::new(vertices, vec![Face::new([0, 1, 2]), Face::new([0, 1, 3])]),
            Err(SceneError::FaceVertexOutOfRange { face: 1, vertex: 3, count: 3 })
        );
    }

    #[test]
    fn test_cuboid_faces_wind_outward() {
        let cuboid = Geometry::cuboid(1.0, 2.0, 3.0);
        let expected = [
            (Geometry::ZMAX_FACE, Vec3::z()),
            (Geometry::XMAX_FACE, Vec3::x()),
            (Geometry::YMAX_FACE, Vec3::y()),
            (Geometry::XMIN_FACE, -Vec3::x()),
            (Geometry::YMIN_FACE, -Vec3::y()),
            (Geometry::ZMIN_FACE, -Vec3::z()),
        ];
        for (face, outward) in expected {
            let v = &cuboid.faces()[face].vertices;
            let (a, b, c) = (cuboid.vertices()[v[0]], cuboid.vertices()[v[1]], cuboid.vertices()[v[2]]);
            let normal = (c - b).cross(&(a - b)).normalize();
            assert_relative_eq!(normal, outward, epsilon = 1e-12);
        }
    }
}
