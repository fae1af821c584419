//! Triangle type

use crate::core::types::Vec3;

/// Three points in space, wound counter-clockwise when seen from the front
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    /// Create a triangle from its three corners
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// First edge (v1 - v0)
    pub fn edge1(&self) -> Vec3 {
        self.v1 - self.v0
    }

    /// Second edge (v2 - v0)
    pub fn edge2(&self) -> Vec3 {
        self.v2 - self.v0
    }

    /// Unit face normal, or zero for a degenerate triangle
    pub fn normal(&self) -> Vec3 {
        self.edge1().cross(self.edge2()).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_ccw_xz() {
        // (0,0) -> (0,1) -> (1,0) in the XZ plane faces +Y
        let tri = Triangle::new(Vec3::ZERO, Vec3::Z, Vec3::X);
        assert_eq!(tri.normal(), Vec3::Y);
    }

    #[test]
    fn test_normal_degenerate() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(tri.normal(), Vec3::ZERO);
    }
}
