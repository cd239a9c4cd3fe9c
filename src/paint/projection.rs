//! A positioned, scaled, rotated, colorized stamp instance ready to paint

use crate::stamp::composer::blend_over;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// One placed stamp instance, immutable once constructed
///
/// The transform is translate to (x, y), then uniform scale, then rotation
/// about the stamp's center. Rasterization inverse-maps destination pixels
/// into the source bitmap with bilinear sampling, so edges come out
/// anti-aliased.
#[derive(Clone, Debug)]
pub struct Projection {
    image: Arc<RgbaImage>,
    x: i64,
    y: i64,
    scale: f64,
    rotation: f64,
    tint: Rgba<u8>,
}

impl Projection {
    /// Create a projection over a shared stamp bitmap
    ///
    /// `rotation` is in degrees; `x` and `y` position the stamp's top-left
    /// corner on the canvas.
    pub const fn new(
        image: Arc<RgbaImage>,
        x: i64,
        y: i64,
        scale: f64,
        rotation: f64,
        tint: Rgba<u8>,
    ) -> Self {
        Self {
            image,
            x,
            y,
            scale,
            rotation,
            tint,
        }
    }

    /// Canvas x position of the stamp's top-left corner
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Canvas y position of the stamp's top-left corner
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// Uniform scale factor
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in degrees about the stamp's center
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Tint color multiplied into the stamp's pixels
    pub const fn tint(&self) -> Rgba<u8> {
        self.tint
    }

    /// Paint this projection onto the canvas
    ///
    /// The caller serializes canvas access; this method itself only reads the
    /// shared stamp bitmap.
    pub fn paint_to(&self, canvas: &mut RgbaImage) {
        let source_width = f64::from(self.image.width());
        let source_height = f64::from(self.image.height());
        if source_width <= 0.0 || source_height <= 0.0 || self.scale <= 0.0 {
            return;
        }

        let theta = self.rotation.to_radians();
        let (sin, cos) = theta.sin_cos();
        let center_x = source_width / 2.0;
        let center_y = source_height / 2.0;

        // Forward map of the source corners bounds the affected canvas region
        let corners = [
            (0.0, 0.0),
            (source_width, 0.0),
            (0.0, source_height),
            (source_width, source_height),
        ];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (px, py) in corners {
            let rel_x = px - center_x;
            let rel_y = py - center_y;
            let dest_x = self.x as f64 + self.scale * (cos * rel_x - sin * rel_y + center_x);
            let dest_y = self.y as f64 + self.scale * (sin * rel_x + cos * rel_y + center_y);
            min_x = min_x.min(dest_x);
            min_y = min_y.min(dest_y);
            max_x = max_x.max(dest_x);
            max_y = max_y.max(dest_y);
        }

        // One pixel of margin keeps anti-aliased edges inside the loop
        let start_x = (min_x - 1.0).floor().max(0.0) as u32;
        let start_y = (min_y - 1.0).floor().max(0.0) as u32;
        let end_x = ((max_x + 1.0).ceil().max(0.0) as u32).min(canvas.width());
        let end_y = ((max_y + 1.0).ceil().max(0.0) as u32).min(canvas.height());

        for dest_y in start_y..end_y {
            for dest_x in start_x..end_x {
                let rel_x = (f64::from(dest_x) + 0.5 - self.x as f64) / self.scale - center_x;
                let rel_y = (f64::from(dest_y) + 0.5 - self.y as f64) / self.scale - center_y;
                let source_x = cos * rel_x + sin * rel_y + center_x;
                let source_y = -sin * rel_x + cos * rel_y + center_y;

                let Some(sampled) = bilinear_sample(&self.image, source_x - 0.5, source_y - 0.5)
                else {
                    continue;
                };
                let tinted = apply_tint(sampled, self.tint);
                let existing = *canvas.get_pixel(dest_x, dest_y);
                canvas.put_pixel(dest_x, dest_y, blend_over(existing, tinted));
            }
        }
    }
}

// Bilinear interpolation over the four surrounding pixels; samples outside
// the bitmap contribute transparency, which fades edges smoothly.
fn bilinear_sample(image: &RgbaImage, x: f64, y: f64) -> Option<Rgba<u8>> {
    let base_x = x.floor();
    let base_y = y.floor();
    let frac_x = x - base_x;
    let frac_y = y - base_y;

    let mut accumulated = [0.0_f64; 4];
    let mut weight_sum = 0.0;
    for (offset_x, offset_y, weight) in [
        (0.0, 0.0, (1.0 - frac_x) * (1.0 - frac_y)),
        (1.0, 0.0, frac_x * (1.0 - frac_y)),
        (0.0, 1.0, (1.0 - frac_x) * frac_y),
        (1.0, 1.0, frac_x * frac_y),
    ] {
        let sample_x = base_x + offset_x;
        let sample_y = base_y + offset_y;
        if sample_x < 0.0
            || sample_y < 0.0
            || sample_x >= f64::from(image.width())
            || sample_y >= f64::from(image.height())
        {
            continue;
        }
        let pixel = image.get_pixel(sample_x as u32, sample_y as u32);
        let alpha = f64::from(pixel.0[3]) / 255.0;
        accumulated[0] += f64::from(pixel.0[0]) * alpha * weight;
        accumulated[1] += f64::from(pixel.0[1]) * alpha * weight;
        accumulated[2] += f64::from(pixel.0[2]) * alpha * weight;
        accumulated[3] += alpha * weight;
        weight_sum += weight;
    }

    if weight_sum <= 0.0 || accumulated[3] <= f64::EPSILON {
        return None;
    }

    let alpha = accumulated[3];
    Some(Rgba([
        (accumulated[0] / alpha).round().clamp(0.0, 255.0) as u8,
        (accumulated[1] / alpha).round().clamp(0.0, 255.0) as u8,
        (accumulated[2] / alpha).round().clamp(0.0, 255.0) as u8,
        (alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ]))
}

fn apply_tint(pixel: Rgba<u8>, tint: Rgba<u8>) -> Rgba<u8> {
    let multiply = |a: u8, b: u8| -> u8 {
        ((f64::from(a) * f64::from(b)) / 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        multiply(pixel.0[0], tint.0[0]),
        multiply(pixel.0[1], tint.0[1]),
        multiply(pixel.0[2], tint.0[2]),
        pixel.0[3],
    ])
}
