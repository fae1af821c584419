//! Procedural terrain: Diamond-Square heightfields, smoothing, meshing and surface queries

pub mod heightfield;
pub use heightfield::{is_valid_size, Heightfield};

pub mod smoothing;
pub use smoothing::{smooth, GAUSSIAN_KERNEL};

pub mod mesh;
pub use mesh::{CellTriangle, Mesh, MeshBuilder, TerrainMetadata, TerrainVertex};

pub mod query;
pub use query::{height_above, locate, surface_point, surface_points, CellLocation};

pub mod scatter;
pub use scatter::{scatter_in_valleys, ScatterParams};

pub mod debug_image;
pub use debug_image::{save_grayscale, to_grayscale};

pub mod config;
pub use config::{Terrain, TerrainConfig};

pub mod background;
pub use background::{build_async, PendingTerrain};
