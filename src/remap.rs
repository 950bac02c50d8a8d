use crate::color::Color;
use crate::error::PixelArtError;
use crate::kmeans::nearest_index;

/// Replace each pixel with its nearest palette color, keeping order.
pub fn map_to_palette(pixels: &[Color], palette: &[Color]) -> Result<Vec<Color>, PixelArtError> {
    if palette.is_empty() {
        return Err(PixelArtError::ZeroColors);
    }
    Ok(pixels
        .iter()
        .map(|&px| palette[nearest_index(px, palette)])
        .collect())
}
