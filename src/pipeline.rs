//! End-to-end conversion: pixels in, block grid and usage table out.

use image::DynamicImage;
use tracing::{debug, info_span};

use crate::blocks::{BlockGrid, aggregate};
use crate::color::Color;
use crate::error::PixelArtError;
use crate::extract::{pixels_from_image, pixels_from_rgba};
use crate::kmeans::build_palette;
use crate::random::{RandomSource, StdRandom};
use crate::remap::map_to_palette;
use crate::render::{DEFAULT_POINT_SIZE, encode_png, render_grid};
use crate::tally::{UsageEntry, UsageTally};

/// Knobs for a single conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelateOptions {
    /// Output grid width in blocks. Height follows the aspect ratio.
    pub grid_width: u32,
    /// Palette size.
    pub colors: usize,
    /// Pixels per grid cell when rendering.
    pub point_size: u32,
    /// Fixed seed for reproducible palettes. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for PixelateOptions {
    fn default() -> Self {
        Self {
            grid_width: 64,
            colors: 8,
            point_size: DEFAULT_POINT_SIZE,
            seed: None,
        }
    }
}

impl PixelateOptions {
    pub fn validate(&self) -> Result<(), PixelArtError> {
        if self.grid_width == 0 {
            return Err(PixelArtError::ZeroGridWidth);
        }
        if self.colors == 0 {
            return Err(PixelArtError::ZeroColors);
        }
        if self.point_size == 0 {
            return Err(PixelArtError::ZeroPointSize);
        }
        Ok(())
    }

    /// Random source matching `seed`.
    pub fn random_source(&self) -> Result<Box<dyn RandomSource>, PixelArtError> {
        Ok(match self.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_os()?),
        })
    }
}

/// Result of one conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixelation {
    pub palette: Vec<Color>,
    pub grid: BlockGrid,
    /// Dominant color per block, row-major, `columns * rows` long.
    pub cells: Vec<Color>,
    pub usage: UsageTally,
}

impl Pixelation {
    pub fn columns(&self) -> u32 {
        self.grid.columns
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Color of the block at `(col, row)`, `None` outside the grid.
    pub fn cell(&self, col: u32, row: u32) -> Option<Color> {
        if col >= self.grid.columns || row >= self.grid.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.grid.columns as usize + col as usize)
            .copied()
    }

    pub fn usage_report(&self) -> Vec<UsageEntry> {
        self.usage.report()
    }

    pub fn to_png(&self, point_size: u32) -> Result<Vec<u8>, PixelArtError> {
        let img = render_grid(&self.cells, self.grid.columns, self.grid.rows, point_size)?;
        encode_png(img)
    }
}

fn pixelate_pixels<R: RandomSource + ?Sized>(
    pixels: &[Color],
    width: u32,
    height: u32,
    opts: &PixelateOptions,
    rng: &mut R,
) -> Result<Pixelation, PixelArtError> {
    opts.validate()?;
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(PixelArtError::DimensionMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let grid = BlockGrid::new(width, height, opts.grid_width)?;

    let _span = info_span!("pixelate", width, height, grid_width = opts.grid_width, k = opts.colors).entered();

    let palette = build_palette(pixels, opts.colors, rng)?;
    let mapped = map_to_palette(pixels, &palette)?;
    let cells = aggregate(&mapped, &grid, &palette)?;
    let usage = UsageTally::from_cells(&palette, &cells);
    debug!(cells = cells.len(), used = usage.ranked().len(), "grid aggregated");

    Ok(Pixelation {
        palette,
        grid,
        cells,
        usage,
    })
}

/// Convert a raw interleaved RGBA buffer of `width * height` pixels.
pub fn pixelate_rgba<R: RandomSource + ?Sized>(
    rgba: &[u8],
    width: u32,
    height: u32,
    opts: &PixelateOptions,
    rng: &mut R,
) -> Result<Pixelation, PixelArtError> {
    let pixels = pixels_from_rgba(rgba)?;
    pixelate_pixels(&pixels, width, height, opts, rng)
}

/// Convert a decoded image.
pub fn pixelate_image<R: RandomSource + ?Sized>(
    img: &DynamicImage,
    opts: &PixelateOptions,
    rng: &mut R,
) -> Result<Pixelation, PixelArtError> {
    let rgba = img.to_rgba8();
    let pixels = pixels_from_image(&rgba);
    pixelate_pixels(&pixels, rgba.width(), rgba.height(), opts, rng)
}

/// Decode an encoded image, convert it, and render the grid as PNG.
pub fn pixelate_bytes(input: &[u8], opts: &PixelateOptions) -> Result<(Vec<u8>, Pixelation), PixelArtError> {
    let img = image::load_from_memory(input)?;
    let mut rng = opts.random_source()?;
    let result = pixelate_image(&img, opts, &mut *rng)?;
    let png = result.to_png(opts.point_size)?;
    Ok((png, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use pretty_assertions::assert_eq;

    fn rgba(colors: &[Color]) -> Vec<u8> {
        colors.iter().flat_map(|c| [c.r, c.g, c.b, 255]).collect()
    }

    #[test]
    fn test_default_options_are_valid() {
        assert!(PixelateOptions::default().validate().is_ok());
    }

    #[test]
    fn test_options_reject_zero_values() {
        let opts = PixelateOptions { colors: 0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(PixelArtError::ZeroColors)));
        let opts = PixelateOptions { grid_width: 0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(PixelArtError::ZeroGridWidth)));
        let opts = PixelateOptions { point_size: 0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(PixelArtError::ZeroPointSize)));
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let raw = rgba(&[Color::BLACK; 3]);
        let err = pixelate_rgba(&raw, 2, 2, &PixelateOptions::default(), &mut ScriptedRandom::new(&[0])).unwrap_err();
        assert!(matches!(err, PixelArtError::DimensionMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_single_color_image() {
        let gray = Color::new(90, 90, 90);
        let raw = rgba(&[gray; 12]);
        let opts = PixelateOptions { grid_width: 2, colors: 1, ..Default::default() };
        let out = pixelate_rgba(&raw, 4, 3, &opts, &mut ScriptedRandom::new(&[5])).unwrap();
        assert_eq!(out.palette, vec![gray]);
        // rows = round(2 * 3 / 4) = 2
        assert_eq!((out.columns(), out.rows()), (2, 2));
        assert!(out.cells.iter().all(|&c| c == gray));
        assert_eq!(out.usage.total(), 4);
    }

    #[test]
    fn test_cell_outside_grid_is_none() {
        let red = Color::new(255, 0, 0);
        let raw = rgba(&[red; 4]);
        let opts = PixelateOptions { grid_width: 2, colors: 1, ..Default::default() };
        let out = pixelate_rgba(&raw, 2, 2, &opts, &mut ScriptedRandom::new(&[0])).unwrap();
        assert_eq!(out.cell(1, 1), Some(red));
        assert_eq!(out.cell(2, 0), None);
        assert_eq!(out.cell(0, 2), None);
        assert_eq!(out.cell(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let colors: Vec<Color> = (0..64u8).map(|i| Color::new(i * 4, 255 - i * 4, i)).collect();
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_raw(8, 8, rgba(&colors)).unwrap());
        let opts = PixelateOptions { grid_width: 4, colors: 3, seed: Some(99), ..Default::default() };
        let a = pixelate_image(&img, &opts, &mut *opts.random_source().unwrap()).unwrap();
        let b = pixelate_image(&img, &opts, &mut *opts.random_source().unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
