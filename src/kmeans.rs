//! Fixed-budget k-means palette extraction in RGB space.

use tracing::{debug, trace};

use crate::color::Color;
use crate::error::PixelArtError;
use crate::random::RandomSource;

/// Lloyd iterations per palette. There is no convergence check.
pub const ITERATIONS: usize = 10;

/// Index of the palette entry closest to `color`.
///
/// Ties go to the lowest index. `palette` must not be empty.
#[inline]
pub fn nearest_index(color: Color, palette: &[Color]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, c) in palette.iter().enumerate() {
        let dist = color.distance_sq(*c);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

#[derive(Clone, Copy, Default)]
struct ColorSum {
    r: u64,
    g: u64,
    b: u64,
    total: u64,
}

impl ColorSum {
    #[inline]
    fn add(&mut self, c: Color) {
        self.r += c.r as u64;
        self.g += c.g as u64;
        self.b += c.b as u64;
        self.total += 1;
    }

    /// Component-wise mean rounded half-up. `None` for an empty cluster.
    fn mean(&self) -> Option<Color> {
        if self.total == 0 {
            return None;
        }
        let n = self.total as f64;
        let avg = |sum: u64| (sum as f64 / n).round() as u8;
        Some(Color::new(avg(self.r), avg(self.g), avg(self.b)))
    }
}

/// Reduce `pixels` to `k` representative colors.
///
/// Centroids start as `k` pixels drawn with replacement, then go through
/// [`ITERATIONS`] rounds of assignment and mean update. A cluster that ends
/// a round empty is re-seeded with another random pixel. The result is in
/// cluster order and always has exactly `k` entries.
pub fn build_palette<R: RandomSource + ?Sized>(
    pixels: &[Color],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Color>, PixelArtError> {
    if pixels.is_empty() {
        return Err(PixelArtError::EmptyImage);
    }
    if k == 0 {
        return Err(PixelArtError::ZeroColors);
    }

    let mut centroids: Vec<Color> = (0..k).map(|_| pixels[rng.index(pixels.len())]).collect();

    for iter in 0..ITERATIONS {
        let mut sums = vec![ColorSum::default(); k];
        for &px in pixels {
            sums[nearest_index(px, &centroids)].add(px);
        }

        for (idx, (centroid, sum)) in centroids.iter_mut().zip(&sums).enumerate() {
            *centroid = match sum.mean() {
                Some(mean) => mean,
                None => {
                    let reseed = pixels[rng.index(pixels.len())];
                    trace!(iter, cluster = idx, %reseed, "re-seeding empty cluster");
                    reseed
                }
            };
        }
        trace!(iter, sizes = ?sums.iter().map(|s| s.total).collect::<Vec<_>>(), "k-means iteration");
    }

    debug!(
        k,
        pixels = pixels.len(),
        palette = ?centroids.iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
        "palette built"
    );
    Ok(centroids)
}
