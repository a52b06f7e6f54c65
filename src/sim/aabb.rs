//! Axis-aligned bounding boxes
//!
//! Boxes are rebuilt from entity position and extent every tick; nothing
//! here carries state between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from a bottom-left corner and an extent (width, height)
    pub fn from_corner(corner: Vec2, extent: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + extent,
        }
    }

    /// Tight box around a point set; empty input collapses to the origin
    pub fn of_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::ZERO;
        let mut max = Vec2::ZERO;
        if let Some(first) = points.first() {
            min = *first;
            max = *first;
            for p in &points[1..] {
                min = min.min(*p);
                max = max.max(*p);
            }
        }
        Self { min, max }
    }

    /// Two boxes overlap unless separated along some axis. Touching edges
    /// count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }
}
