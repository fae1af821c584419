//! Heightfield to triangle mesh conversion
//!
//! The grid lies in the XZ plane centered on the origin, grid `x` along
//! world X and grid `y` along world Z, with elevation on Y. Each grid cell
//! emits two triangles:
//!
//! ```text
//!   (x,y) ──── (x+1,y)
//!     │ UL    ╱  │      UpperLeft:  (x,y),   (x,y+1),   (x+1,y)
//!     │     ╱    │      LowerRight: (x,y+1), (x+1,y+1), (x+1,y)
//!     │   ╱   LR │
//!   (x,y+1) ── (x+1,y+1)
//! ```
//!
//! Both are counter-clockwise seen from +Y. The query engine selects triangles
//! through [`CellTriangle`], which reads them back from the index buffer, so
//! the two can never disagree about the diagonal.

use bytemuck::{Pod, Zeroable};

use super::heightfield::Heightfield;
use crate::core::{Error, Result, Vec2, Vec3};
use crate::math::{Aabb, Triangle};

/// Which of the two triangles of a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellTriangle {
    /// Covers the half of the cell where `fx + fy <= 1`
    UpperLeft = 0,
    /// Covers the half of the cell where `fx + fy > 1`
    LowerRight = 1,
}

impl CellTriangle {
    /// Pick the triangle containing the in-cell fraction `(fx, fy)`.
    /// Points on the diagonal belong to `UpperLeft`.
    pub fn select(fx: f32, fy: f32) -> Self {
        if fx + fy <= 1.0 {
            Self::UpperLeft
        } else {
            Self::LowerRight
        }
    }

    /// Grid offsets of the three corners relative to the cell origin, in winding order
    pub fn corners(self) -> [(usize, usize); 3] {
        match self {
            Self::UpperLeft => [(0, 0), (0, 1), (1, 0)],
            Self::LowerRight => [(0, 1), (1, 1), (1, 0)],
        }
    }
}

/// Interleaved vertex layout for GPU upload
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangulated terrain surface
#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Unit-length smoothed vertex normals
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Three indices per triangle, two triangles per cell, cells row-major
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangle `index` as read from the index buffer
    pub fn triangle(&self, index: usize) -> Triangle {
        let i = &self.indices[index * 3..index * 3 + 3];
        Triangle::new(
            self.positions[i[0] as usize],
            self.positions[i[1] as usize],
            self.positions[i[2] as usize],
        )
    }

    /// One of the two triangles of cell (x, y) on a grid of `size` cells per side
    pub fn cell_triangle(&self, size: usize, x: usize, y: usize, which: CellTriangle) -> Triangle {
        self.triangle((y * (size - 1) + x) * 2 + which as usize)
    }

    /// Interleaved vertices, ready for `bytemuck::cast_slice`
    pub fn vertices(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Index buffer as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Lookup data the surface query engine needs alongside the mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainMetadata {
    /// Grid cells per side
    pub size: usize,
    /// World distance between neighbouring grid cells
    pub xz_scale: f32,
    /// Lowest vertex Y
    pub min_y: f32,
    /// Highest vertex Y
    pub max_y: f32,
}

impl TerrainMetadata {
    /// Half the world extent along X and Z
    pub fn half_extent(&self) -> f32 {
        (self.size - 1) as f32 * self.xz_scale * 0.5
    }

    /// World-space bounds of the mesh
    pub fn bounds(&self) -> Aabb {
        let h = self.half_extent();
        Aabb::new(Vec3::new(-h, self.min_y, -h), Vec3::new(h, self.max_y, h))
    }
}

/// Builds a [`Mesh`] and [`TerrainMetadata`] from a heightfield
#[derive(Clone, Debug)]
pub struct MeshBuilder {
    xz_scale: f32,
    y_scale: f32,
    uv_scale: f32,
    strict: bool,
}

impl MeshBuilder {
    /// `xz_scale`: world spacing between grid cells.
    /// `y_scale`: world height of the full elevation range.
    /// `uv_scale`: texture repeats across the whole terrain.
    pub fn new(xz_scale: f32, y_scale: f32, uv_scale: f32) -> Self {
        Self { xz_scale, y_scale, uv_scale, strict: false }
    }

    /// Fail with [`Error::DegenerateHeightfield`] on a flat heightfield instead
    /// of building a flat mesh at y = 0
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.xz_scale.is_finite() || self.xz_scale <= 0.0 {
            return Err(Error::InvalidArgument(format!("xz_scale must be > 0, got {}", self.xz_scale)));
        }
        if !self.y_scale.is_finite() {
            return Err(Error::InvalidArgument(format!("y_scale must be finite, got {}", self.y_scale)));
        }
        if !self.uv_scale.is_finite() || self.uv_scale <= 0.0 {
            return Err(Error::InvalidArgument(format!("uv_scale must be > 0, got {}", self.uv_scale)));
        }
        Ok(())
    }

    /// Build the mesh. Elevations are normalized to `[0, 1]` and scaled by `y_scale`.
    pub fn build(&self, field: &Heightfield) -> Result<(Mesh, TerrainMetadata)> {
        self.validate()?;

        let size = field.size();
        let (lo, hi) = field.min_max();
        let range = hi - lo;
        let scaler = if range > 0.0 {
            1.0 / range
        } else if self.strict {
            return Err(Error::DegenerateHeightfield { value: lo });
        } else {
            log::warn!("Heightfield has no elevation range (all cells {}), building flat mesh", lo);
            0.0
        };

        let half = (size / 2) as f32;
        let uv_step = self.uv_scale / (size - 1) as f32;
        let vertex_count = size * size;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for y in 0..size {
            for x in 0..size {
                let height = (field.get(x, y) - lo) * scaler * self.y_scale;
                min_y = min_y.min(height);
                max_y = max_y.max(height);
                positions.push(Vec3::new(
                    (x as f32 - half) * self.xz_scale,
                    height,
                    (y as f32 - half) * self.xz_scale,
                ));
                uvs.push(Vec2::new(x as f32, y as f32) * uv_step);
            }
        }

        let indices = triangulate(size);
        let normals = vertex_normals(&positions, &indices);

        let metadata = TerrainMetadata { size, xz_scale: self.xz_scale, min_y, max_y };
        log::debug!(
            "Built terrain mesh: {} vertices, {} triangles, y in [{:.3}, {:.3}]",
            positions.len(),
            indices.len() / 3,
            min_y,
            max_y
        );

        Ok((Mesh { positions, normals, uvs, indices }, metadata))
    }
}

/// Index buffer for a `size` x `size` grid, two triangles per cell
fn triangulate(size: usize) -> Vec<u32> {
    let cells = size - 1;
    let mut indices = Vec::with_capacity(cells * cells * 6);
    let vertex = |x: usize, y: usize| (y * size + x) as u32;

    for y in 0..cells {
        for x in 0..cells {
            for which in [CellTriangle::UpperLeft, CellTriangle::LowerRight] {
                for (dx, dy) in which.corners() {
                    indices.push(vertex(x + dx, y + dy));
                }
            }
        }
    }
    indices
}

/// Average of unit face normals around each vertex, renormalized
fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = Triangle::new(positions[i0], positions[i1], positions[i2]).normal();
        acc[i0] += face;
        acc[i1] += face;
        acc[i2] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
