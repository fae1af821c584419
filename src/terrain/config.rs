//! Terrain configuration and the full generation pipeline

use std::path::Path;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::heightfield::{is_valid_size, Heightfield};
use super::mesh::{Mesh, MeshBuilder, TerrainMetadata};
use super::query;
use super::smoothing::smooth;
use crate::core::{Error, Result, Vec2, Vec3};

/// Parameters for one terrain build
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid cells per side, `2^n + 1`
    pub size: usize,
    /// Per-octave falloff of the random displacement
    pub roughness: f32,
    /// Seed for the displacement RNG
    pub seed: u64,
    /// Apply the Gaussian smoothing pass
    pub smooth: bool,
    /// World spacing between grid cells
    pub xz_scale: f32,
    /// World height of the full elevation range
    pub y_scale: f32,
    /// Texture repeats across the terrain
    pub uv_scale: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 129,
            roughness: 0.5,
            seed: 12345,
            smooth: true,
            xz_scale: 0.5,
            y_scale: 10.0,
            uv_scale: 8.0,
        }
    }
}

impl TerrainConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every parameter before any work is done
    pub fn validate(&self) -> Result<()> {
        if !is_valid_size(self.size) {
            return Err(Error::InvalidArgument(format!("size must be 2^n + 1 with n >= 2, got {}", self.size)));
        }
        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(Error::InvalidArgument(format!("roughness must be >= 0, got {}", self.roughness)));
        }
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

    /// Generate, smooth and mesh a terrain
    pub fn build(&self) -> Result<Terrain> {
        self.validate()?;
        log::info!(
            "Building {}x{} terrain (roughness {}, seed {}, smooth {})",
            self.size, self.size, self.roughness, self.seed, self.smooth
        );

        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut heightfield = Heightfield::generate(self.size, self.roughness, &mut rng)?;
        log::info!("Heightfield generated in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

        if self.smooth {
            let start = Instant::now();
            heightfield = smooth(&heightfield);
            log::info!("Heightfield smoothed in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
        }

        let start = Instant::now();
        let (mesh, metadata) = MeshBuilder::new(self.xz_scale, self.y_scale, self.uv_scale).build(&heightfield)?;
        log::info!(
            "Mesh built in {:.1}ms ({} vertices, {} triangles)",
            start.elapsed().as_secs_f64() * 1000.0,
            mesh.positions.len(),
            mesh.triangle_count()
        );

        Ok(Terrain { heightfield, mesh, metadata })
    }
}

/// A finished terrain: the heightfield it came from, its mesh and lookup metadata
#[derive(Clone, Debug)]
pub struct Terrain {
    pub heightfield: Heightfield,
    pub mesh: Mesh,
    pub metadata: TerrainMetadata,
}

impl Terrain {
    /// See [`query::surface_point`]
    pub fn surface_point(&self, position: Vec2) -> Result<Vec3> {
        query::surface_point(position, &self.mesh, &self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = TerrainConfig::default();
        assert_eq!(config.size, 129);
        assert_eq!(config.roughness, 0.5);
        assert_eq!(config.seed, 12345);
        assert!(config.smooth);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = TerrainConfig::from_json_str(r#"{ "size": 33, "y_scale": 100.0 }"#).unwrap();
        assert_eq!(config.size, 33);
        assert_eq!(config.y_scale, 100.0);
        assert_eq!(config.xz_scale, TerrainConfig::default().xz_scale);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(TerrainConfig::from_json_str("{ size: "), Err(Error::Config(_))));
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{ "size": 100 }"#),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{ "roughness": -0.5 }"#),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_load_roundtrip() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("terrain.json");
        let config = TerrainConfig { size: 65, seed: 9, smooth: false, ..Default::default() };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(TerrainConfig::load(&path).unwrap(), config);
        assert!(matches!(
            TerrainConfig::load(&temp_dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_build() {
        let config = TerrainConfig { size: 33, y_scale: 20.0, ..Default::default() };
        let terrain = config.build().unwrap();
        assert_eq!(terrain.heightfield.size(), 33);
        assert_eq!(terrain.mesh.positions.len(), 33 * 33);
        assert_eq!(terrain.metadata.size, 33);
        assert_eq!(terrain.metadata.xz_scale, 0.5);

        let p = terrain.surface_point(Vec2::new(0.25, 0.75)).unwrap();
        assert!(p.y >= terrain.metadata.min_y - 1e-3 && p.y <= terrain.metadata.max_y + 1e-3);
    }

    #[test]
    fn test_build_deterministic() {
        let config = TerrainConfig { size: 33, ..Default::default() };
        let a = config.build().unwrap();
        let b = config.build().unwrap();
        assert_eq!(a.heightfield, b.heightfield);
        assert_eq!(a.mesh.positions, b.mesh.positions);
    }

    #[test]
    fn test_smooth_flag() {
        let smoothed = TerrainConfig { size: 17, ..Default::default() }.build().unwrap();
        let raw = TerrainConfig { size: 17, smooth: false, ..Default::default() }.build().unwrap();
        assert_ne!(smoothed.heightfield, raw.heightfield);
    }
}
