//! Keyframe interpolation of a parent attribute
//!
//! An [`Interpolator`] is attached as a child of an attribute group. Time is
//! measured from the first update it receives: the first update latches the
//! activation instant and every later update works on the elapsed time
//! since then.
//!
//! - before the first keyframe nothing happens
//! - between keyframes the value is interpolated linearly
//! - past the last keyframe the final value is written and the interpolator
//!   finishes, destroying itself and notifying its observers once
//!
//! The interpolator itself only computes what should happen; applying the
//! value to the parent and the self-destruction are done by
//! [`SceneGraph::update_interpolator`](super::SceneGraph::update_interpolator).

use super::error::SceneError;
use super::transform_group::Attribute;
use crate::foundation::math::utils;

/// Progress of an interpolator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolatorState {
    /// No keyframe reached yet
    #[default]
    BeforeStart,
    /// Between the first and last keyframes
    Interpolating,
    /// Past the last keyframe; the node has destroyed itself
    Finished,
}

/// Outcome of advancing an interpolator to a new instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolatorStep {
    /// Nothing to write
    Idle,
    /// Write this value to the parent attribute
    Set(f64),
    /// Write this final value, then finish
    Complete(f64),
}

/// Animates one attribute of its parent between keyframes
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    attribute: Attribute,
    instants: Vec<u64>,
    values: Vec<f64>,
    key1: usize,
    key2: usize,
    activated_at: Option<u64>,
    state: InterpolatorState,
}

impl Interpolator {
    /// Create an interpolator from parallel keyframe instants (milliseconds) and values
    ///
    /// Instants must be strictly increasing and there must be at least two
    /// keyframes.
    pub fn new(attribute: Attribute, instants: Vec<u64>, values: Vec<f64>) -> Result<Self, SceneError> {
        if instants.len() != values.len() {
            return Err(SceneError::KeyframeCountMismatch {
                instants: instants.len(),
                values: values.len(),
            });
        }
        if instants.len() < 2 {
            return Err(SceneError::TooFewKeyframes(instants.len()));
        }
        if let Some(index) = instants.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SceneError::NonIncreasingInstants { index, next: index + 1 });
        }

        Ok(Self {
            attribute,
            instants,
            values,
            key1: 0,
            key2: 1,
            activated_at: None,
            state: InterpolatorState::BeforeStart,
        })
    }

    /// Attribute animated in the parent
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Keyframe instants in milliseconds
    pub fn instants(&self) -> &[u64] {
        &self.instants
    }

    /// Keyframe values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Current progress
    pub fn state(&self) -> InterpolatorState {
        self.state
    }

    /// Instant of the first update, once there has been one
    pub fn activated_at(&self) -> Option<u64> {
        self.activated_at
    }

    /// Advance to `now` (milliseconds) and report what to write
    ///
    /// A finished interpolator stays idle.
    pub fn advance(&mut self, now: u64) -> InterpolatorStep {
        if self.state == InterpolatorState::Finished {
            return InterpolatorStep::Idle;
        }
        let activated = *self.activated_at.get_or_insert(now);
        let t = now.saturating_sub(activated);

        let first = self.instants[0];
        let last = self.instants[self.instants.len() - 1];
        if t < first {
            return InterpolatorStep::Idle;
        }
        if t > last {
            self.state = InterpolatorState::Finished;
            return InterpolatorStep::Complete(self.values[self.values.len() - 1]);
        }

        while self.instants[self.key1] > t {
            self.key1 -= 1;
            self.key2 -= 1;
        }
        while self.instants[self.key2] < t {
            self.key1 += 1;
            self.key2 += 1;
        }
        self.state = InterpolatorState::Interpolating;
        InterpolatorStep::Set(self.interpolate(t))
    }

    fn interpolate(&self, t: u64) -> f64 {
        let span = (self.instants[self.key2] - self.instants[self.key1]) as f64;
        let into = (t - self.instants[self.key1]) as f64;
        utils::lerp(self.values[self.key1], self.values[self.key2], into / span)
    }
}
