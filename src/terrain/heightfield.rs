//! Square elevation grid and Diamond-Square generation
//!
//! The grid is stored as one row-major buffer (`index = y * size + x`).
//! Generation walks the octaves iteratively: each level runs a diamond step
//! over every tile, then a square step over every edge midpoint. Square-step
//! reads wrap modulo `size - 1` and midpoints on the `x = 0` / `y = 0`
//! borders are mirrored to the opposite border, so the finished map tiles
//! seamlessly.

use rand::Rng;

use crate::core::{Error, Result};

/// Square grid of elevations with `size = 2^n + 1`, `n >= 2`
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    size: usize,
    values: Vec<f32>,
}

/// Whether `size` is a valid grid size (`size - 1` a power of two, `size >= 5`)
pub fn is_valid_size(size: usize) -> bool {
    size >= 5 && (size - 1).is_power_of_two()
}

fn check_size(size: usize) -> Result<()> {
    if is_valid_size(size) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "heightfield size must be 2^n + 1 with n >= 2, got {}",
            size
        )))
    }
}

impl Heightfield {
    /// Generate a tileable fractal heightfield with Diamond-Square.
    ///
    /// Random offsets are `(r - 0.5) * roughness^depth * tile`, with `r`
    /// uniform in `[0, 1)` and `depth` counting octaves from 0. The four
    /// corners share a single draw at depth 0, which keeps the corner cells
    /// consistent with the tileable border.
    pub fn generate<R: Rng + ?Sized>(size: usize, roughness: f32, rng: &mut R) -> Result<Self> {
        check_size(size)?;
        if !roughness.is_finite() || roughness < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "roughness must be finite and >= 0, got {}",
                roughness
            )));
        }

        let last = size - 1;
        let mut field = Self { size, values: vec![0.0; size * size] };

        let corner = displacement(rng, 1.0, last);
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            field.set(x, y, corner);
        }

        let mut tile = last;
        let mut depth = 0;
        let mut octave_scale = 1.0f32;
        while tile >= 2 {
            diamond_step(&mut field, tile, octave_scale, rng);
            square_step(&mut field, tile, octave_scale, rng);
            log::trace!("Diamond-square level {} done (tile {}, scale {:.4})", depth, tile, octave_scale);

            tile /= 2;
            depth += 1;
            octave_scale *= roughness;
        }

        log::debug!("Generated {}x{} heightfield over {} octaves", size, size, depth);
        Ok(field)
    }

    /// Wrap an existing row-major buffer of `size * size` elevations
    pub fn from_values(size: usize, values: Vec<f32>) -> Result<Self> {
        check_size(size)?;
        if values.len() != size * size {
            return Err(Error::InvalidArgument(format!(
                "expected {} elevations for size {}, got {}",
                size * size,
                size,
                values.len()
            )));
        }
        Ok(Self { size, values })
    }

    /// Heightfield with every cell at `value`
    pub fn flat(size: usize, value: f32) -> Result<Self> {
        check_size(size)?;
        Ok(Self { size, values: vec![value; size * size] })
    }

    /// Constructor for buffers already known to match `size`
    pub(crate) fn from_raw(size: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), size * size);
        Self { size, values }
    }

    /// Cells per side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major elevations
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Row-major index of cell (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Elevation at (x, y). Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    /// Elevation at a possibly out-of-range coordinate, wrapped modulo `size - 1`
    #[inline]
    pub fn get_wrapped(&self, x: isize, y: isize) -> f32 {
        let period = (self.size - 1) as isize;
        self.get(x.rem_euclid(period) as usize, y.rem_euclid(period) as usize)
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.index(x, y);
        self.values[i] = value;
    }

    /// Minimum and maximum elevation
    pub fn min_max(&self) -> (f32, f32) {
        self.values.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }
}

fn displacement<R: Rng + ?Sized>(rng: &mut R, octave_scale: f32, tile: usize) -> f32 {
    (rng.r#gen::<f32>() - 0.5) * octave_scale * tile as f32
}

/// Set each tile center to the mean of its corners plus a random offset.
fn diamond_step<R: Rng + ?Sized>(field: &mut Heightfield, tile: usize, octave_scale: f32, rng: &mut R) {
    let last = field.size - 1;
    let half = tile / 2;

    for y in (0..last).step_by(tile) {
        for x in (0..last).step_by(tile) {
            let mean = (field.get(x, y)
                + field.get(x + tile, y)
                + field.get(x, y + tile)
                + field.get(x + tile, y + tile))
                * 0.25;
            field.set(x + half, y + half, mean + displacement(rng, octave_scale, tile));
        }
    }
}

/// Set each edge midpoint to the mean of its four orthogonal neighbours plus a
/// random offset. Only corners and diamond centers of this level are read.
fn square_step<R: Rng + ?Sized>(field: &mut Heightfield, tile: usize, octave_scale: f32, rng: &mut R) {
    let last = field.size - 1;
    let half = tile / 2;

    for y in (0..last).step_by(half) {
        // Corner rows hold midpoints between corners, center rows start at x = 0
        let x_start = if (y / half) % 2 == 0 { half } else { 0 };
        for x in (x_start..last).step_by(tile) {
            let (xi, yi, h) = (x as isize, y as isize, half as isize);
            let mean = (field.get_wrapped(xi - h, yi)
                + field.get_wrapped(xi + h, yi)
                + field.get_wrapped(xi, yi - h)
                + field.get_wrapped(xi, yi + h))
                * 0.25;
            let value = mean + displacement(rng, octave_scale, tile);

            field.set(x, y, value);
            if x == 0 {
                field.set(last, y, value);
            }
            if y == 0 {
                field.set(x, last, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    fn assert_tileable(field: &Heightfield) {
        let last = field.size() - 1;
        for i in 0..field.size() {
            assert!((field.get(0, i) - field.get(last, i)).abs() < 1e-5, "column seam at y={}", i);
            assert!((field.get(i, 0) - field.get(i, last)).abs() < 1e-5, "row seam at x={}", i);
        }
    }

    #[test]
    fn test_valid_sizes() {
        for n in 2..=12u32 {
            let size = (1usize << n) + 1;
            let field = Heightfield::generate(size, 0.5, &mut rng()).expect("valid size");
            assert_eq!(field.size(), size);
            assert_eq!(field.values().len(), size * size);
            assert!(field.values().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_invalid_sizes() {
        for size in [0, 1, 2, 3, 4, 6, 7, 10, 1024, 1026] {
            let result = Heightfield::generate(size, 0.5, &mut rng());
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "size {} accepted", size);
        }
    }

    #[test]
    fn test_invalid_roughness() {
        for roughness in [-0.01, -1.0, f32::NAN, f32::INFINITY] {
            let result = Heightfield::generate(33, roughness, &mut rng());
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "roughness {} accepted", roughness);
        }
    }

    #[test]
    fn test_zero_roughness_allowed() {
        assert!(Heightfield::generate(17, 0.0, &mut rng()).is_ok());
    }

    #[test]
    fn test_border_tileable() {
        for size in [5, 9, 65, 257] {
            let field = Heightfield::generate(size, 0.7, &mut rng()).unwrap();
            assert_tileable(&field);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = Heightfield::generate(65, 0.5, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Heightfield::generate(65, 0.5, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = Heightfield::generate(65, 0.5, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_not_flat() {
        let field = Heightfield::generate(65, 0.5, &mut rng()).unwrap();
        let (lo, hi) = field.min_max();
        assert!(hi > lo);
    }

    #[test]
    fn test_get_wrapped() {
        let values: Vec<f32> = (0..25).map(|i| i as f32).collect();
        let field = Heightfield::from_values(5, values).unwrap();
        assert_eq!(field.get_wrapped(-1, 0), field.get(3, 0));
        assert_eq!(field.get_wrapped(4, 2), field.get(0, 2));
        assert_eq!(field.get_wrapped(1, -2), field.get(1, 2));
    }

    #[test]
    fn test_from_values_validation() {
        assert!(matches!(
            Heightfield::from_values(5, vec![0.0; 24]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Heightfield::from_values(6, vec![0.0; 36]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Heightfield::from_values(5, vec![0.0; 25]).is_ok());
    }

    #[test]
    fn test_flat_min_max() {
        let field = Heightfield::flat(9, 3.0).unwrap();
        assert_eq!(field.min_max(), (3.0, 3.0));
    }
}
