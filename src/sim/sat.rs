//! Separating-axis collision test for convex polygons
//!
//! Projects both vertex sets onto every edge normal of both polygons; a gap
//! on any axis means no collision. The axis with the smallest overlap gives
//! the minimum translation vector.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::polygon::Polygon;

/// Result of a polygon collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    /// Whether the polygons intersect
    pub collided: bool,
    /// Minimum translation vector pushing the first polygon out of the
    /// second; only meaningful when `collided` is true
    pub penetration: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            collided: false,
            penetration: Vec2::ZERO,
        }
    }
}

/// Projection interval of a vertex set onto an axis
fn project(poly: &Polygon, axis: Vec2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in poly.verts() {
        let d = v.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Test two world-space polygons for overlap.
///
/// Convexity of both inputs is a precondition (checked in debug builds);
/// the result is unspecified for concave input. Touching polygons with a
/// zero-width overlap on some axis report a miss.
pub fn sat_collision(a: &Polygon, b: &Polygon) -> CollisionResult {
    debug_assert!(a.is_convex(), "SAT tester requires convex polygons");
    debug_assert!(b.is_convex(), "SAT tester requires convex polygons");

    let mut best_overlap = f32::INFINITY;
    let mut best_axis = Vec2::ZERO;

    for axis in a.edge_normals().chain(b.edge_normals()) {
        if axis == Vec2::ZERO {
            // Degenerate edge
            continue;
        }
        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        let overlap = a_max.min(b_max) - a_min.max(b_min);
        if overlap <= 0.0 {
            return CollisionResult::miss();
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    // Orient the MTV so it pushes `a` away from `b`
    let delta = a.centroid() - b.centroid();
    let axis = if delta.dot(best_axis) < 0.0 {
        -best_axis
    } else {
        best_axis
    };
    CollisionResult {
        collided: true,
        penetration: axis * best_overlap,
    }
}

/// Velocity response for a colliding pair, applied per world axis: when
/// both components share a sign, both invert; when they oppose, they are
/// exchanged additively, the second update reading the first body's
/// already-adjusted value; a zero component on either side leaves the axis
/// untouched.
///
/// This is a placeholder response, not a rigid-body solver: it conserves
/// neither momentum nor energy and ignores mass.
pub fn resolve_velocities(va: &mut Vec2, vb: &mut Vec2) {
    for i in 0..2 {
        let (a, b) = (va[i], vb[i]);
        if a == 0.0 || b == 0.0 {
            continue;
        }
        if a.signum() == b.signum() {
            va[i] = -a;
            vb[i] = -b;
        } else {
            va[i] = a - b;
            vb[i] = b + va[i];
        }
    }
}
