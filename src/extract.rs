use image::RgbaImage;

use crate::color::Color;
use crate::error::PixelArtError;

/// Flatten an interleaved RGBA buffer into RGB colors, dropping alpha.
pub fn pixels_from_rgba(raw: &[u8]) -> Result<Vec<Color>, PixelArtError> {
    if raw.len() % 4 != 0 {
        return Err(PixelArtError::InvalidBufferLength { len: raw.len() });
    }
    Ok(raw
        .chunks_exact(4)
        .map(|chunk| Color::new(chunk[0], chunk[1], chunk[2]))
        .collect())
}

/// Same as [`pixels_from_rgba`] for an already decoded image.
pub fn pixels_from_image(img: &RgbaImage) -> Vec<Color> {
    img.pixels().map(|p| Color::new(p[0], p[1], p[2])).collect()
}
