use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::StickcastResult;
use crate::foundation::math::mul_div255_u8;

/// Decoded bitmap with premultiplied RGBA8 pixels.
///
/// Cloning is cheap; pixels are shared.
#[derive(Clone, Debug)]
pub struct PreparedBitmap {
    pixels: Arc<image::RgbaImage>,
}

impl PreparedBitmap {
    /// Wrap pixels that are already premultiplied.
    pub fn from_premultiplied(pixels: image::RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Bitmap of `width x height` filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> Self {
        Self::from_premultiplied(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(color.to_array()),
        ))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Premultiplied pixels.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

/// Decode an encoded image (PNG, ...) into premultiplied RGBA8.
pub fn decode_bitmap(bytes: &[u8]) -> StickcastResult<PreparedBitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let mut rgba = dyn_img.to_rgba8();
    premultiply_rgba8_in_place(&mut rgba);
    Ok(PreparedBitmap::from_premultiplied(rgba))
}

/// Read and decode a bitmap file.
pub fn load_bitmap(path: &Path) -> StickcastResult<PreparedBitmap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read bitmap '{}'", path.display()))?;
    let bitmap = decode_bitmap(&bytes).with_context(|| format!("decode '{}'", path.display()))?;
    Ok(bitmap)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
