use palette::Srgb;
use std::fmt;
use std::str::FromStr;

use crate::error::PixelArtError;

/// Labels on swatches brighter than this get black text.
const LABEL_LUMINANCE_THRESHOLD: f32 = 186.0;

/// An opaque 8-bit RGB color.
///
/// Alpha never takes part in distance or averaging, so it is not stored.
/// Equality and hashing are structural, which makes `Color` usable as a map
/// key without going through a string form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    #[inline(always)]
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Perceived brightness on the 0-255 scale (ITU-R BT.601 weights).
    pub fn luminance(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    /// Black or white, whichever stays legible when drawn on top of `self`.
    pub fn contrasting_text(self) -> Color {
        if self.luminance() > LABEL_LUMINANCE_THRESHOLD {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }

    /// `#RRGGBB`, uppercase.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parses `#RRGGBB`, `RRGGBB` or the short `#RGB` form.
    pub fn from_hex(s: &str) -> Result<Self, PixelArtError> {
        let srgb = Srgb::<u8>::from_str(s.trim())
            .map_err(|_| PixelArtError::InvalidHex(s.to_string()))?;
        Ok(srgb.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PixelArtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distance_is_squared_euclidean() {
        let a = Color::new(10, 20, 30);
        let b = Color::new(13, 16, 30);
        assert_eq!(a.distance_sq(b), 9 + 16);
        assert_eq!(b.distance_sq(a), 25);
        assert_eq!(Color::BLACK.distance_sq(Color::WHITE), 3 * 255 * 255);
    }

    #[test]
    fn test_hex_is_uppercase_with_hash() {
        assert_eq!(Color::new(255, 10, 171).to_hex(), "#FF0AAB");
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::from_hex("#FF0AAB").unwrap(), Color::new(255, 10, 171));
        assert_eq!(Color::from_hex("ff0aab").unwrap(), Color::new(255, 10, 171));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(Color::WHITE.contrasting_text(), Color::BLACK);
        assert_eq!(Color::BLACK.contrasting_text(), Color::WHITE);
        // Pure yellow: 0.299*255 + 0.587*255 = 225.9
        assert_eq!(Color::new(255, 255, 0).contrasting_text(), Color::BLACK);
        // Pure red: 76.2
        assert_eq!(Color::new(255, 0, 0).contrasting_text(), Color::WHITE);
    }

    #[test]
    fn test_srgb_conversion() {
        let c = Color::new(1, 2, 3);
        let s: Srgb<u8> = c.into();
        assert_eq!((s.red, s.green, s.blue), (1, 2, 3));
        assert_eq!(Color::from(s), c);
    }
}
