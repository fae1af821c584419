//! Grayscale heightfield rendering for debugging

use std::path::Path;

use image::{GrayImage, Luma};

use super::heightfield::Heightfield;
use crate::core::Result;

/// Map each cell linearly from `[min, max]` to `[0, 255]`. A flat field is all black.
pub fn to_grayscale(field: &Heightfield) -> GrayImage {
    let (lo, hi) = field.min_max();
    let range = hi - lo;
    let scale = if range > 0.0 { 255.0 / range } else { 0.0 };
    let size = field.size() as u32;

    GrayImage::from_fn(size, size, |x, y| {
        let level = (field.get(x as usize, y as usize) - lo) * scale;
        Luma([level.round().clamp(0.0, 255.0) as u8])
    })
}

/// Write the grayscale rendering to `path`; the format follows the extension
pub fn save_grayscale(field: &Heightfield, path: &Path) -> Result<()> {
    to_grayscale(field).save(path)?;
    log::info!("Wrote {}x{} heightfield image to {}", field.size(), field.size(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_linear_mapping() {
        let values: Vec<f32> = (0..25).map(|i| i as f32).collect();
        let field = Heightfield::from_values(5, values).unwrap();
        let img = to_grayscale(&field);
        assert_eq!(img.dimensions(), (5, 5));
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(4, 4)[0], 255);
        // Cell 12 of 0..=24 sits at the midpoint
        assert_eq!(img.get_pixel(2, 2)[0], 128);
        assert_eq!(img.get_pixel(1, 0)[0], (255.0f32 / 24.0).round() as u8);
    }

    #[test]
    fn test_flat_is_black() {
        let img = to_grayscale(&Heightfield::flat(9, 7.0).unwrap());
        assert!(img.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_save_png() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("height.png");
        let values: Vec<f32> = (0..81).map(|i| (i % 9) as f32).collect();
        let field = Heightfield::from_values(9, values).unwrap();

        save_grayscale(&field, &path).expect("save failed");
        let loaded = image::open(&path).expect("open failed").to_luma8();
        assert_eq!(loaded, to_grayscale(&field));
    }
}
