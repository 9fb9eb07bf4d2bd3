/// Frame signatures and duplicate planning.
pub(crate) mod cache;
/// Premultiplied source-over.
pub(crate) mod composite;
/// Single-frame compositor.
pub(crate) mod frame;
/// Whole-timeline render loop.
pub(crate) mod pipeline;
/// Mouth mirror, resize and rotation.
pub(crate) mod transform;

use crate::foundation::math::unpremul_u8;

/// One rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Take ownership of premultiplied pixels.
    pub fn from_premultiplied(img: image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
            premultiplied: true,
        }
    }

    /// Straight-alpha copy of the pixels, ready for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        out
    }
}
