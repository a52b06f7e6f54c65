//! Convex polygon geometry
//!
//! Polygons are defined in local (model) space with counter-clockwise
//! winding; a scale/rotation/translation transform maps them into world
//! space. Winding must be consistent or the edge normals come out inverted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An ordered set of convex, counter-clockwise local-space vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    verts: Vec<Vec2>,
}

impl Polygon {
    /// Create from counter-clockwise local-space vertices
    pub fn new(verts: Vec<Vec2>) -> Self {
        debug_assert!(verts.len() >= 3, "polygon needs at least 3 vertices");
        Self { verts }
    }

    /// Axis-aligned rectangle centered on the model origin
    pub fn rect(half_extent: Vec2) -> Self {
        Self::new(vec![
            Vec2::new(-half_extent.x, -half_extent.y),
            Vec2::new(half_extent.x, -half_extent.y),
            Vec2::new(half_extent.x, half_extent.y),
            Vec2::new(-half_extent.x, half_extent.y),
        ])
    }

    pub fn verts(&self) -> &[Vec2] {
        &self.verts
    }

    /// Map into world space: `world = R(rotation) * S(scale) * local + translation`.
    /// Scale and rotation act about the model origin; translation applies last.
    pub fn transformed(&self, scale: Vec2, rotation: f32, translation: Vec2) -> Polygon {
        let (sin, cos) = rotation.sin_cos();
        let verts = self
            .verts
            .iter()
            .map(|v| {
                let s = *v * scale;
                Vec2::new(s.x * cos - s.y * sin, s.x * sin + s.y * cos) + translation
            })
            .collect();
        Polygon { verts }
    }

    /// Vertex average; adequate for deciding which way a penetration
    /// vector should point
    pub fn centroid(&self) -> Vec2 {
        let sum: Vec2 = self.verts.iter().copied().sum();
        sum / self.verts.len() as f32
    }

    /// True when every turn between consecutive edges has the same sign.
    /// Collinear runs are tolerated.
    pub fn is_convex(&self) -> bool {
        let n = self.verts.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0f32;
        for i in 0..n {
            let a = self.verts[i];
            let b = self.verts[(i + 1) % n];
            let c = self.verts[(i + 2) % n];
            let cross = (b - a).perp_dot(c - b);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Outward unit normals of each edge, assuming counter-clockwise winding
    pub(crate) fn edge_normals(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.verts.len();
        (0..n).map(move |i| {
            let edge = self.verts[(i + 1) % n] - self.verts[i];
            Vec2::new(edge.y, -edge.x).normalize_or_zero()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_transform_scale_then_rotate_then_translate() {
        // Corner (-1, -1): scale x2 -> (-2, -2), rotate 90deg -> (2, -2),
        // translate (1, 1) -> (3, -1); likewise for the other corners
        let square = Polygon::rect(Vec2::splat(1.0));
        let world = square.transformed(Vec2::splat(2.0), FRAC_PI_2, Vec2::new(1.0, 1.0));
        assert_vec_close(world.verts()[0], Vec2::new(3.0, -1.0));
        assert_vec_close(world.verts()[1], Vec2::new(3.0, 3.0));
        assert_vec_close(world.verts()[2], Vec2::new(-1.0, 3.0));
        assert_vec_close(world.verts()[3], Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_transform_identity() {
        let tri = Polygon::new(vec![
            Vec2::new(0.0, 0.5),
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
        ]);
        let same = tri.transformed(Vec2::ONE, 0.0, Vec2::ZERO);
        for (a, b) in tri.verts().iter().zip(same.verts()) {
            assert_vec_close(*a, *b);
        }
    }

    #[test]
    fn test_convexity() {
        assert!(Polygon::rect(Vec2::splat(1.0)).is_convex());
        // Dart: the reflex vertex at the origin breaks convexity
        let dart = Polygon::new(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(0.0, 2.0),
        ]);
        assert!(!dart.is_convex());
    }

    #[test]
    fn test_edge_normals_point_outward() {
        let square = Polygon::rect(Vec2::splat(1.0));
        let normals: Vec<Vec2> = square.edge_normals().collect();
        // CCW rect starting bottom-left: bottom, right, top, left edges
        assert_vec_close(normals[0], Vec2::new(0.0, -1.0));
        assert_vec_close(normals[1], Vec2::new(1.0, 0.0));
        assert_vec_close(normals[2], Vec2::new(0.0, 1.0));
        assert_vec_close(normals[3], Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_centroid() {
        let square = Polygon::rect(Vec2::splat(1.0));
        assert_vec_close(square.centroid(), Vec2::ZERO);
        let shifted = square.transformed(Vec2::ONE, 0.0, Vec2::new(2.0, -1.0));
        assert_vec_close(shifted.centroid(), Vec2::new(2.0, -1.0));
    }
}
