//! Valley-restricted placement of decorative objects

use rand::Rng;

use super::mesh::{Mesh, TerrainMetadata};
use super::query::surface_point;
use crate::core::{Vec2, Vec3};

/// Parameters for scattering points over low terrain
#[derive(Clone, Debug)]
pub struct ScatterParams {
    /// Points to place
    pub count: usize,
    /// Random positions to try before giving up
    pub attempts: usize,
    /// Accept points whose height is in the lowest fraction of `[min_y, max_y]`
    pub max_height_fraction: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: 64,
            attempts: 1024,
            max_height_fraction: 0.3,
        }
    }
}

/// Random surface points lying in valleys.
///
/// Returns fewer than `count` points if `attempts` runs out first.
pub fn scatter_in_valleys<R: Rng + ?Sized>(
    mesh: &Mesh,
    metadata: &TerrainMetadata,
    params: &ScatterParams,
    rng: &mut R,
) -> Vec<Vec3> {
    let threshold = metadata.min_y + (metadata.max_y - metadata.min_y) * params.max_height_fraction;
    let mut placed = Vec::with_capacity(params.count);

    for _ in 0..params.attempts {
        if placed.len() >= params.count {
            break;
        }
        let position = Vec2::new(rng.r#gen::<f32>(), rng.r#gen::<f32>());
        // gen() can return exactly 0.0, which the query rejects
        let Ok(point) = surface_point(position, mesh, metadata) else {
            continue;
        };
        if point.y <= threshold {
            placed.push(point);
        }
    }

    log::debug!(
        "Scattered {}/{} points below y = {:.3} in {} attempts max",
        placed.len(),
        params.count,
        threshold,
        params.attempts
    );
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::heightfield::Heightfield;
    use crate::terrain::mesh::MeshBuilder;
    use crate::terrain::smoothing::smooth;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn terrain() -> (Mesh, TerrainMetadata) {
        let raw = Heightfield::generate(65, 0.6, &mut StdRng::seed_from_u64(5)).unwrap();
        MeshBuilder::new(1.0, 30.0, 1.0).build(&smooth(&raw)).unwrap()
    }

    #[test]
    fn test_points_in_valleys() {
        let (mesh, meta) = terrain();
        let params = ScatterParams { count: 20, attempts: 5000, max_height_fraction: 0.4 };
        let points = scatter_in_valleys(&mesh, &meta, &params, &mut StdRng::seed_from_u64(1));
        assert!(!points.is_empty());
        assert!(points.len() <= 20);
        let threshold = meta.min_y + (meta.max_y - meta.min_y) * 0.4;
        let bounds = meta.bounds();
        for p in &points {
            assert!(p.y <= threshold);
            assert!(bounds.contains_point(*p) || p.y.abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_fraction_fills_count() {
        let (mesh, meta) = terrain();
        let params = ScatterParams { count: 50, attempts: 1000, max_height_fraction: 2.0 };
        let points = scatter_in_valleys(&mesh, &meta, &params, &mut StdRng::seed_from_u64(2));
        assert_eq!(points.len(), 50);
    }

    #[test]
    fn test_zero_attempts() {
        let (mesh, meta) = terrain();
        let params = ScatterParams { attempts: 0, ..Default::default() };
        assert!(scatter_in_valleys(&mesh, &meta, &params, &mut StdRng::seed_from_u64(3)).is_empty());
    }
}
