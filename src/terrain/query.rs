//! Surface height queries against a built terrain mesh
//!
//! A normalized position `(u, v)` in the open unit square maps onto one grid
//! cell and one of its two triangles. A vertical ray cast from above the
//! terrain is intersected with that triangle to find the surface point.

use rayon::prelude::*;

use super::heightfield::is_valid_size;
use super::mesh::{CellTriangle, Mesh, TerrainMetadata};
use crate::core::{Error, Result, Vec2, Vec3};
use crate::math::{Ray, TriangleHit};

/// Grid cell and triangle containing a normalized position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellLocation {
    pub x: usize,
    pub y: usize,
    /// Fractional position inside the cell along grid x
    pub fx: f32,
    /// Fractional position inside the cell along grid y
    pub fy: f32,
    pub triangle: CellTriangle,
}

fn check_position(position: Vec2) -> Result<()> {
    if position.x.is_nan() || position.y.is_nan() {
        return Err(Error::InvalidArgument(format!("query position is NaN: {}", position)));
    }
    let inside = |c: f32| c > 0.0 && c < 1.0;
    if !inside(position.x) || !inside(position.y) {
        return Err(Error::InvalidPosition { u: position.x, v: position.y });
    }
    Ok(())
}

fn check_size(size: usize) -> Result<()> {
    if is_valid_size(size) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("grid size must be 2^n + 1 with n >= 2, got {}", size)))
    }
}

/// Mesh buffers must match the grid described by the metadata
fn check_mesh(mesh: &Mesh, metadata: &TerrainMetadata) -> Result<()> {
    check_size(metadata.size)?;
    let cells = metadata.size - 1;
    let vertices = metadata.size.checked_mul(metadata.size);
    let indices = cells.checked_mul(cells).and_then(|n| n.checked_mul(6));
    if vertices != Some(mesh.positions.len()) || indices != Some(mesh.indices.len()) {
        return Err(Error::InvalidArgument(format!(
            "mesh with {} vertices and {} indices does not match grid size {}",
            mesh.positions.len(),
            mesh.indices.len(),
            metadata.size
        )));
    }
    Ok(())
}

/// Locate the cell and triangle under a normalized position
pub fn locate(position: Vec2, size: usize) -> Result<CellLocation> {
    check_position(position)?;
    check_size(size)?;

    let cells = size - 1;
    let grid = position * cells as f32;
    // u < 1 can still round up to `cells` in f32
    let x = (grid.x.floor() as usize).min(cells - 1);
    let y = (grid.y.floor() as usize).min(cells - 1);
    let fx = grid.x - x as f32;
    let fy = grid.y - y as f32;

    Ok(CellLocation { x, y, fx, fy, triangle: CellTriangle::select(fx, fy) })
}

/// World-space (x, z) under a normalized position
pub fn world_xz(position: Vec2, metadata: &TerrainMetadata) -> Vec2 {
    (position - Vec2::splat(0.5)) * ((metadata.size - 1) as f32 * metadata.xz_scale)
}

/// Surface point under a normalized position.
///
/// Fails with [`Error::InvalidArgument`] for NaN input and
/// [`Error::InvalidPosition`] outside the open unit square. Metadata that does
/// not describe the mesh is an [`Error::InvalidArgument`]. If the ray misses
/// the selected triangle, which only floating-point edge cases can cause, the
/// result falls back to `(x, 0, z)`.
pub fn surface_point(position: Vec2, mesh: &Mesh, metadata: &TerrainMetadata) -> Result<Vec3> {
    let cell = locate(position, metadata.size)?;
    check_mesh(mesh, metadata)?;
    let xz = world_xz(position, metadata);

    let tri = mesh.cell_triangle(metadata.size, cell.x, cell.y, cell.triangle);
    let above = metadata.max_y + (metadata.max_y - metadata.min_y) + 1.0;
    let ray = Ray::new(Vec3::new(xz.x, above, xz.y), Vec3::NEG_Y);

    match ray.intersect_triangle(&tri) {
        TriangleHit::Hit { t, .. } => Ok(ray.at(t)),
        TriangleHit::Miss => {
            log::debug!(
                "Surface ray missed {:?} triangle of cell ({}, {}) at {}, using flat fallback",
                cell.triangle,
                cell.x,
                cell.y,
                position
            );
            Ok(Vec3::new(xz.x, 0.0, xz.y))
        }
        TriangleHit::Parallel => {
            log::warn!(
                "Surface ray parallel to {:?} triangle of cell ({}, {}); triangle {:?}",
                cell.triangle,
                cell.x,
                cell.y,
                tri
            );
            Ok(Vec3::new(xz.x, 0.0, xz.y))
        }
    }
}

/// Surface point raised by `clearance` along Y, e.g. for camera placement
pub fn height_above(position: Vec2, clearance: f32, mesh: &Mesh, metadata: &TerrainMetadata) -> Result<Vec3> {
    surface_point(position, mesh, metadata).map(|p| p + Vec3::Y * clearance)
}

/// Run independent surface queries in parallel, one result per input position
pub fn surface_points(positions: &[Vec2], mesh: &Mesh, metadata: &TerrainMetadata) -> Vec<Result<Vec3>> {
    positions
        .par_iter()
        .map(|&p| surface_point(p, mesh, metadata))
        .collect()
}
