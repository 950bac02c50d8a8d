//! Turn a bitmap into coarse pixel art.
//!
//! The image is reduced to `k` colors with a fixed-budget k-means in RGB
//! space, every pixel is snapped to its nearest palette entry, and the result
//! is split into a grid of blocks that each take their most frequent color.
//! A usage table reports how many blocks ended up with each color.
//!
//! The same pipeline is exposed to JavaScript through `wasm-bindgen` and to
//! native callers through [`pixelate_bytes`] / [`pixelate_rgba`].

use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod blocks;
pub mod color;
pub mod error;
pub mod extract;
pub mod kmeans;
pub mod pipeline;
pub mod random;
pub mod remap;
pub mod render;
pub mod tally;

pub use blocks::{Block, BlockGrid, aggregate, dominant_color};
pub use color::Color;
pub use error::PixelArtError;
pub use extract::pixels_from_rgba;
pub use kmeans::build_palette;
pub use pipeline::{PixelateOptions, Pixelation, pixelate_bytes, pixelate_image, pixelate_rgba};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use remap::map_to_palette;
pub use tally::{UsageEntry, UsageTally};

fn js_err(e: PixelArtError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn hex_array(colors: &[Color]) -> Array {
    let out = Array::new();
    for c in colors {
        out.push(&JsValue::from_str(&c.to_hex()));
    }
    out
}

/// `{ image, width, height, palette, cells, usage }` for the page to draw.
fn to_js(result: &Pixelation, point_size: u32) -> Result<Object, JsValue> {
    let png = result.to_png(point_size).map_err(js_err)?;

    let usage = Array::new();
    for entry in result.usage_report() {
        let row = Object::new();
        Reflect::set(&row, &JsValue::from_str("color"), &JsValue::from_str(&entry.hex))?;
        Reflect::set(&row, &JsValue::from_str("count"), &JsValue::from_f64(entry.count as f64))?;
        Reflect::set(&row, &JsValue::from_str("textColor"), &JsValue::from_str(&entry.text_color))?;
        usage.push(&row);
    }

    let out = Object::new();
    Reflect::set(&out, &JsValue::from_str("image"), &Uint8Array::from(png.as_slice()))?;
    Reflect::set(&out, &JsValue::from_str("width"), &JsValue::from_f64(result.columns() as f64))?;
    Reflect::set(&out, &JsValue::from_str("height"), &JsValue::from_f64(result.rows() as f64))?;
    Reflect::set(&out, &JsValue::from_str("palette"), &hex_array(&result.palette))?;
    Reflect::set(&out, &JsValue::from_str("cells"), &hex_array(&result.cells))?;
    Reflect::set(&out, &JsValue::from_str("usage"), &usage)?;
    Ok(out)
}

/// Convert an encoded image (PNG, JPEG, ...) to pixel art.
///
/// `grid_width` is the number of blocks across; the block rows follow the
/// image's aspect ratio. `n_colors` is the palette size.
#[wasm_bindgen]
pub fn pixelate(input: Vec<u8>, grid_width: u32, n_colors: usize) -> Result<Object, JsValue> {
    let opts = PixelateOptions {
        grid_width,
        colors: n_colors,
        ..Default::default()
    };
    let img = image::load_from_memory(&input)
        .map_err(PixelArtError::from)
        .map_err(js_err)?;
    let mut rng = StdRandom::from_os().map_err(js_err)?;
    let result = pixelate_image(&img, &opts, &mut rng).map_err(js_err)?;
    to_js(&result, opts.point_size)
}

/// Convert raw RGBA pixels, e.g. straight from a canvas `ImageData`.
#[wasm_bindgen(js_name = pixelateRgba)]
pub fn pixelate_canvas(
    data: Vec<u8>,
    width: u32,
    height: u32,
    grid_width: u32,
    n_colors: usize,
) -> Result<Object, JsValue> {
    let opts = PixelateOptions {
        grid_width,
        colors: n_colors,
        ..Default::default()
    };
    let mut rng = StdRandom::from_os().map_err(js_err)?;
    let result = pixelate_rgba(&data, width, height, &opts, &mut rng).map_err(js_err)?;
    to_js(&result, opts.point_size)
}
