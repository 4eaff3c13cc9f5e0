//! Scene graph errors

use super::element::NodeId;
use super::transform_group::TransformKind;

/// Errors raised while building or mutating a scene graph
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// The node exists but is of a different kind
    #[error("scene node {node:?} is not a {expected}")]
    WrongKind {
        /// Offending node
        node: NodeId,
        /// Kind the operation needs
        expected: &'static str,
    },

    /// A transform kind was added twice to the same group
    #[error("duplicate transform: {0:?}")]
    DuplicateTransform(TransformKind),

    /// A transform group already holds every transform kind it can
    #[error("too many transforms (maximum {max})")]
    TooManyTransforms {
        /// Capacity of a transform group
        max: usize,
    },

    /// Child index outside the parent's child list
    #[error("child index ({index}) out of range (0..{len})")]
    ChildIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of children
        len: usize,
    },

    /// Attaching the child would make it its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// A face needs at least three vertices
    #[error("face {face} has {count} vertices, minimum is 3")]
    FaceTooSmall {
        /// Face index
        face: usize,
        /// Vertices in the face
        count: usize,
    },

    /// A face refers to a vertex the geometry does not have
    #[error("face {face} refers to vertex {vertex}, geometry has {count} vertices")]
    FaceVertexOutOfRange {
        /// Face index
        face: usize,
        /// Vertex index used by the face
        vertex: usize,
        /// Vertices in the geometry
        count: usize,
    },

    /// Interpolator instants and values differ in length
    #[error("mismatch in number of interpolation instants ({instants}) and values ({values})")]
    KeyframeCountMismatch {
        /// Number of instants
        instants: usize,
        /// Number of values
        values: usize,
    },

    /// Interpolators need two keyframes
    #[error("{0} key frames specified, two is minimum")]
    TooFewKeyframes(usize),

    /// Instants must be strictly increasing
    #[error("instant {index} does not come before instant {next}")]
    NonIncreasingInstants {
        /// Index of the earlier instant
        index: usize,
        /// Index of the instant that fails to follow it
        next: usize,
    },
}
