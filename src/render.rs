use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::color::Color;
use crate::error::PixelArtError;

/// On-screen size of one grid cell, in pixels.
pub const DEFAULT_POINT_SIZE: u32 = 10;

/// Paint a row-major grid of cells, each as an opaque `point_size` square.
pub fn render_grid(
    cells: &[Color],
    columns: u32,
    rows: u32,
    point_size: u32,
) -> Result<RgbaImage, PixelArtError> {
    if point_size == 0 {
        return Err(PixelArtError::ZeroPointSize);
    }
    let expected = columns as usize * rows as usize;
    if cells.len() != expected {
        return Err(PixelArtError::DimensionMismatch {
            expected,
            actual: cells.len(),
        });
    }

    let too_large = || PixelArtError::OutputTooLarge {
        columns,
        rows,
        point_size,
    };
    let out_w = columns.checked_mul(point_size).ok_or_else(too_large)?;
    let out_h = rows.checked_mul(point_size).ok_or_else(too_large)?;
    let len = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(too_large)?;
    let mut out_buf: Vec<u8> = vec![0u8; len];

    for y in 0..out_h {
        let cell_row = (y / point_size) as usize * columns as usize;
        for x in 0..out_w {
            let c = cells[cell_row + (x / point_size) as usize];
            let idx = (y as usize * out_w as usize + x as usize) * 4;
            out_buf[idx..idx + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }

    RgbaImage::from_raw(out_w, out_h, out_buf)
        .ok_or_else(|| PixelArtError::Encode("Failed to build output image".to_string()))
}

pub fn encode_png(img: RgbaImage) -> Result<Vec<u8>, PixelArtError> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| PixelArtError::Encode(e.to_string()))?;
    }
    Ok(buf)
}
