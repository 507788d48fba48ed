//! Freehand path capture
//!
//! Pointer samples arrive at whatever rate the browser delivers them. The
//! smoother lags each sample halfway toward the previous smoothed point and
//! only keeps points that are more than `PATH_MIN_SPACING` from the last kept
//! one, which yields an evenly spaced polyline the boats can follow.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PATH_MIN_SPACING;

/// One in-progress drawing gesture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSmoother {
    points: Vec<Vec2>,
    /// Last smoothed sample, kept even when the spacing filter rejects it
    last: Option<Vec2>,
    min_spacing: f32,
}

impl PathSmoother {
    /// Start a gesture at the press point
    pub fn begin(start: Vec2) -> Self {
        Self::with_spacing(start, PATH_MIN_SPACING)
    }

    pub fn with_spacing(start: Vec2, min_spacing: f32) -> Self {
        Self {
            points: vec![start],
            last: None,
            min_spacing,
        }
    }

    /// Feed a raw pointer sample. Returns true when a point was appended.
    pub fn push(&mut self, sample: Vec2) -> bool {
        let smoothed = match self.last {
            Some(prev) => (prev + sample) * 0.5,
            None => sample,
        };
        self.last = Some(smoothed);

        let far_enough = self
            .points
            .last()
            .is_none_or(|tail| tail.distance(smoothed) > self.min_spacing);
        if far_enough {
            self.points.push(smoothed);
        }
        far_enough
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// End the gesture. A path needs at least two points to be followable.
    pub fn finish(self) -> Option<Vec<Vec2>> {
        (self.points.len() >= 2).then_some(self.points)
    }
}
