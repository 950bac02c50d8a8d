use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelArtError {
    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Palette size must be at least 1")]
    ZeroColors,

    #[error("Grid width must be at least 1")]
    ZeroGridWidth,

    #[error("Point size must be at least 1")]
    ZeroPointSize,

    #[error("RGBA buffer length {len} is not a multiple of 4")]
    InvalidBufferLength { len: usize },

    #[error("Pixel count mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Output too large: {columns}x{rows} cells at point size {point_size}")]
    OutputTooLarge { columns: u32, rows: u32, point_size: u32 },

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Random source unavailable: {0}")]
    Random(String),
}

pub type Result<T> = std::result::Result<T, PixelArtError>;
