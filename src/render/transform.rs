use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::assets::geometry::MouthPlacement;
use crate::foundation::core::{Affine, Point, Vec2};

/// Lanczos3 resize. Returns a copy when the size is unchanged.
pub fn resize_lanczos(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    if width == 0 || height == 0 || img.width() == 0 || img.height() == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Rotate clockwise about the image center, keeping the canvas size.
///
/// Sampling is bicubic. Uncovered pixels are transparent.
pub fn rotate_clockwise(img: &RgbaImage, degrees: f64) -> RgbaImage {
    let (w, h) = img.dimensions();
    let center = Vec2::new(f64::from(w) / 2.0, f64::from(h) / 2.0);
    // y points down, so a positive kurbo rotation turns clockwise on screen.
    let forward =
        Affine::translate(center) * Affine::rotate(degrees.to_radians()) * Affine::translate(-center);
    let inverse = forward.inverse();

    let mut out = RgbaImage::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        px.0 = sample_bicubic(img, p.x - 0.5, p.y - 0.5);
    }
    out
}

/// Apply a placement's mirror, scale and rotation to a mouth bitmap.
pub fn place_mouth(mouth: &RgbaImage, placement: &MouthPlacement) -> RgbaImage {
    let mut img = if placement.scale_x < 0.0 {
        imageops::flip_horizontal(mouth)
    } else {
        mouth.clone()
    };

    let sx = placement.scale_x.abs();
    let sy = placement.scale_y;
    if sx != 1.0 || sy != 1.0 {
        let w = (f64::from(img.width()) * sx).max(0.0) as u32;
        let h = (f64::from(img.height()) * sy).max(0.0) as u32;
        img = resize_lanczos(&img, w, h);
    }

    if placement.rotation_deg != 0.0 {
        img = rotate_clockwise(&img, placement.rotation_deg);
    }
    img
}

// Keys cubic with a = -0.5.
fn cubic_weight(d: f64) -> f64 {
    const A: f64 = -0.5;
    let d = d.abs();
    if d <= 1.0 {
        ((A + 2.0) * d - (A + 3.0)) * d * d + 1.0
    } else if d < 2.0 {
        ((A * d - 5.0 * A) * d + 8.0 * A) * d - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bicubic(img: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));

    let mut acc = [0.0f64; 4];
    for dy in -1i64..=2 {
        let wy = cubic_weight(fy - dy as f64);
        let sy = y0 as i64 + dy;
        if wy == 0.0 || sy < 0 || sy >= h {
            continue;
        }
        for dx in -1i64..=2 {
            let wx = cubic_weight(fx - dx as f64);
            let sx = x0 as i64 + dx;
            if wx == 0.0 || sx < 0 || sx >= w {
                continue;
            }
            let p = img.get_pixel(sx as u32, sy as u32).0;
            for (a, c) in acc.iter_mut().zip(p) {
                *a += f64::from(c) * wx * wy;
            }
        }
    }
    let alpha = acc[3].round().clamp(0.0, 255.0) as u8;
    // Overshoot must not leave color above alpha in premultiplied space.
    let color = |v: f64| (v.round().clamp(0.0, 255.0) as u8).min(alpha);
    [color(acc[0]), color(acc[1]), color(acc[2]), alpha]
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
