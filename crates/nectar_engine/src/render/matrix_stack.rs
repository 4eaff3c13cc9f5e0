//! Fixed-capacity transform stack used during traversal

use crate::foundation::math::{Mat4, Vec4};

/// Stack of per-group local matrices
///
/// Each entry is the local matrix of one transform group on the current
/// path. Pushing past capacity is refused and counted, so the matching pop
/// stays balanced without removing a real entry.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    matrices: Vec<Mat4>,
    overflow: usize,
}

impl MatrixStack {
    /// Maximum nesting depth of transform groups
    pub const CAPACITY: usize = 100;

    /// Empty stack
    pub fn new() -> Self {
        Self {
            matrices: Vec::with_capacity(Self::CAPACITY),
            overflow: 0,
        }
    }

    /// Push a matrix; returns `false` if the stack is full
    pub fn push(&mut self, matrix: Mat4) -> bool {
        if self.matrices.len() >= Self::CAPACITY {
            self.overflow += 1;
            return false;
        }
        self.matrices.push(matrix);
        true
    }

    /// Pop the entry matching the most recent push
    pub fn pop(&mut self) {
        if self.overflow > 0 {
            self.overflow -= 1;
        } else {
            self.matrices.pop();
        }
    }

    /// Current depth, not counting refused pushes
    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.matrices.clear();
        self.overflow = 0;
    }

    /// Apply every entry to `point`, innermost first
    pub fn transform(&self, point: Vec4) -> Vec4 {
        self.matrices.iter().rev().fold(point, |p, matrix| matrix * p)
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}
