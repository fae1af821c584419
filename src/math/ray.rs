//! Ray type and operations

use crate::core::types::Vec3;
use super::triangle::Triangle;

/// Tolerance for hits at the ray origin, and for parallel rays relative to
/// the triangle's edge lengths
pub const EPSILON: f32 = 1e-6;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Outcome of a ray-triangle test
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriangleHit {
    /// Ray hits the triangle at parameter `t` with barycentric (u, v)
    Hit { t: f32, u: f32, v: f32 },
    /// Ray misses the triangle or hits behind the origin
    Miss,
    /// Ray lies in or parallel to the triangle plane
    Parallel,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-triangle intersection using the Möller–Trumbore method.
    ///
    /// Edges are taken as `v1 - v0` and `v2 - v0`. The barycentric bounds are
    /// inclusive, so hits on an edge or vertex count. Hits with `t <= EPSILON`
    /// are reported as misses.
    ///
    /// The parallel test scales with `|edge1| * |edge2|`, so small triangles
    /// are not mistaken for parallel ones. Degenerate triangles are parallel.
    pub fn intersect_triangle(&self, tri: &Triangle) -> TriangleHit {
        let edge1 = tri.edge1();
        let edge2 = tri.edge2();

        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() <= EPSILON * edge1.length() * edge2.length() {
            return TriangleHit::Parallel;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - tri.v0;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return TriangleHit::Miss;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return TriangleHit::Miss;
        }

        let t = edge2.dot(q) * inv_det;
        if t > EPSILON {
            TriangleHit::Hit { t, u, v }
        } else {
            TriangleHit::Miss
        }
    }
}
