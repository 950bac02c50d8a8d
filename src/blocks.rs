//! Block-grid geometry and per-block dominant color selection.

use tracing::debug;

use crate::color::Color;
use crate::error::PixelArtError;

/// A rectangle of source pixels that becomes one output cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Layout of the output grid over the source image.
///
/// The row count follows the source aspect ratio. Block sizes use ceiling
/// division, so the last row or column may reach past the image edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    pub image_width: u32,
    pub image_height: u32,
    pub columns: u32,
    pub rows: u32,
    pub block_width: u32,
    pub block_height: u32,
}

impl BlockGrid {
    pub fn new(image_width: u32, image_height: u32, columns: u32) -> Result<Self, PixelArtError> {
        if columns == 0 {
            return Err(PixelArtError::ZeroGridWidth);
        }
        if image_width == 0 || image_height == 0 {
            return Err(PixelArtError::EmptyImage);
        }

        let aspect = image_height as f64 / image_width as f64;
        let rows = ((columns as f64 * aspect).round() as u32).max(1);
        let grid = Self {
            image_width,
            image_height,
            columns,
            rows,
            block_width: image_width.div_ceil(columns),
            block_height: image_height.div_ceil(rows),
        };
        debug!(?grid, "block grid");
        Ok(grid)
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn block(&self, col: u32, row: u32) -> Block {
        Block {
            x: col * self.block_width,
            y: row * self.block_height,
            width: self.block_width,
            height: self.block_height,
        }
    }

    /// All blocks in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| self.block(col, row)))
    }
}

/// Palette colors with a count each, kept in first-insertion order.
///
/// Repeated palette entries share the slot of their first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCounts {
    entries: Vec<(Color, usize)>,
}

impl ColorCounts {
    /// Every palette color starts with an explicit zero.
    pub fn seeded(palette: &[Color]) -> Self {
        let mut entries: Vec<(Color, usize)> = Vec::with_capacity(palette.len());
        for &c in palette {
            if !entries.iter().any(|(e, _)| *e == c) {
                entries.push((c, 0));
            }
        }
        Self { entries }
    }

    /// Bumps `color` by one. Colors outside the table are ignored.
    #[inline]
    pub fn record(&mut self, color: Color) {
        if let Some((_, n)) = self.entries.iter_mut().find(|(e, _)| *e == color) {
            *n += 1;
        }
    }

    pub fn count(&self, color: Color) -> usize {
        self.entries
            .iter()
            .find(|(e, _)| *e == color)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose count beats every earlier one.
    ///
    /// An all-zero table yields its first color.
    pub fn most_frequent(&self) -> Option<Color> {
        let mut best = self.entries.first()?.0;
        let mut max = 0;
        for &(c, n) in &self.entries {
            if n > max {
                max = n;
                best = c;
            }
        }
        Some(best)
    }
}

/// Most frequent palette color among the mapped pixels inside `block`.
///
/// Pixels are addressed as `y * image_width + x`; any index past the end of
/// `mapped` is skipped. `palette` must not be empty.
pub fn dominant_color(mapped: &[Color], block: &Block, image_width: u32, palette: &[Color]) -> Color {
    let mut counts = ColorCounts::seeded(palette);
    let width = image_width as usize;

    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            let idx = y as usize * width + x as usize;
            if let Some(&c) = mapped.get(idx) {
                counts.record(c);
            }
        }
    }

    counts.most_frequent().unwrap_or(palette[0])
}

/// Dominant color of every block, row-major.
pub fn aggregate(mapped: &[Color], grid: &BlockGrid, palette: &[Color]) -> Result<Vec<Color>, PixelArtError> {
    if palette.is_empty() {
        return Err(PixelArtError::ZeroColors);
    }
    Ok(grid
        .blocks()
        .map(|block| dominant_color(mapped, &block, grid.image_width, palette))
        .collect())
}
