//! Separable Gaussian smoothing for heightfields
//!
//! Diamond-Square leaves visible creases along tile boundaries. A 7-tap
//! Gaussian applied as a horizontal pass followed by a vertical pass softens
//! them at 14 taps per cell instead of 49. Taps wrap modulo `size - 1`, same
//! as generation, so the result is still tileable.

use super::heightfield::Heightfield;

/// 1D Gaussian taps, centered on index 3
pub const GAUSSIAN_KERNEL: [f32; 7] = [0.006, 0.061, 0.242, 0.383, 0.242, 0.061, 0.006];

const RADIUS: isize = (GAUSSIAN_KERNEL.len() / 2) as isize;

/// Blur a heightfield, returning a new grid of the same size
pub fn smooth(field: &Heightfield) -> Heightfield {
    let size = field.size();
    let period = (size - 1) as isize;

    // The published taps sum to 1.001; normalize so the blur stays within the input range
    let sum: f32 = GAUSSIAN_KERNEL.iter().sum();
    let kernel = GAUSSIAN_KERNEL.map(|w| w / sum);

    let src = field.values();
    let mut horizontal = vec![0.0f32; size * size];
    for y in 0..size {
        let row = &src[y * size..(y + 1) * size];
        for x in 0..size - 1 {
            horizontal[y * size + x] = convolve(&kernel, |k| {
                row[(x as isize + k).rem_euclid(period) as usize]
            });
        }
        horizontal[y * size + size - 1] = horizontal[y * size];
    }

    let mut out = vec![0.0f32; size * size];
    for y in 0..size - 1 {
        for x in 0..size {
            out[y * size + x] = convolve(&kernel, |k| {
                horizontal[(y as isize + k).rem_euclid(period) as usize * size + x]
            });
        }
    }
    let (body, last_row) = out.split_at_mut((size - 1) * size);
    last_row.copy_from_slice(&body[..size]);

    Heightfield::from_raw(size, out)
}

#[inline]
fn convolve(kernel: &[f32; 7], sample: impl Fn(isize) -> f32) -> f32 {
    kernel
        .iter()
        .enumerate()
        .map(|(i, w)| w * sample(i as isize - RADIUS))
        .sum()
}
