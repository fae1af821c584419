//! Heightmesh - fractal terrain generation and surface height sampling

pub mod core;
pub mod math;
pub mod terrain;
