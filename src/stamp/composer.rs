//! Pixel-level strategies combining pairs of stamps into new stamps
//!
//! Both strategies handle stamps of differing dimensions with a fixed
//! alignment policy: source bitmaps are aligned at their top-left corners.
//! The intersection works over the common (minimum-dimension) region and the
//! merge over the union (maximum-dimension) region.

use crate::io::error::{Result, composition_error};
use crate::stamp::{Stamp, StampMetadata};
use image::{Rgba, RgbaImage};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::warn;

/// A composition strategy plus the number of passes it performs over a group
#[derive(Clone, Copy, Debug)]
pub enum ComposerStrategy {
    /// Keep the first stamp's pixels only where both stamps have content;
    /// carves silhouettes
    Intersection {
        /// Number of randomized composite passes
        iterations: usize,
    },
    /// Alpha-blend both stamps over the union of their areas; layers textures
    Merge {
        /// Number of randomized composite passes
        iterations: usize,
    },
}

impl ComposerStrategy {
    /// Number of composite passes this strategy performs
    pub const fn iterations(&self) -> usize {
        match self {
            Self::Intersection { iterations } | Self::Merge { iterations } => *iterations,
        }
    }

    /// Combine two stamps into a new stamp
    ///
    /// The result's rarity is the mean of the sources' rarities.
    ///
    /// # Errors
    ///
    /// Returns a composition error when either input has zero area.
    pub fn compose_pair(&self, a: &Stamp, b: &Stamp) -> Result<Stamp> {
        if a.area() == 0 || b.area() == 0 {
            return Err(composition_error(
                self.operation_name(),
                &"input stamp has zero area",
            ));
        }
        let image = match self {
            Self::Intersection { .. } => intersect(a.image(), b.image()),
            Self::Merge { .. } => merge(a.image(), b.image()),
        };
        let metadata = StampMetadata {
            rarity: f64::midpoint(a.metadata().rarity, b.metadata().rarity),
        };
        Ok(Stamp::new(image, metadata))
    }

    /// Run the configured number of passes over a flat stamp sequence
    ///
    /// Each pass picks a random pair, composes it and appends the result, so
    /// later passes may pair earlier composites. Pair selection comes from the
    /// supplied seeded generator, making the expansion reproducible. A failed
    /// pass is logged and skipped rather than aborting the expansion. With
    /// zero iterations (or fewer than two stamps) the input passes through
    /// unchanged.
    pub fn apply(&self, mut stamps: Vec<Stamp>, rng: &mut StdRng) -> Vec<Stamp> {
        for _ in 0..self.iterations() {
            if stamps.len() < 2 {
                break;
            }
            let first = rng.random_range(0..stamps.len());
            let mut second = rng.random_range(0..stamps.len() - 1);
            if second >= first {
                second += 1;
            }
            let (Some(a), Some(b)) = (stamps.get(first), stamps.get(second)) else {
                continue;
            };
            match self.compose_pair(a, b) {
                Ok(composite) => stamps.push(composite),
                Err(error) => {
                    warn!(operation = self.operation_name(), %error, "composite pass skipped");
                }
            }
        }
        stamps
    }

    const fn operation_name(&self) -> &'static str {
        match self {
            Self::Intersection { .. } => "intersection",
            Self::Merge { .. } => "merge",
        }
    }
}

// Logical AND on occupancy over the common region.
fn intersect(a: &RgbaImage, b: &RgbaImage) -> RgbaImage {
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    RgbaImage::from_fn(width, height, |x, y| {
        let pixel_a = *a.get_pixel(x, y);
        let pixel_b = *b.get_pixel(x, y);
        if pixel_a.0[3] > 0 && pixel_b.0[3] > 0 {
            pixel_a
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

// Logical OR on occupancy over the union region, blending overlaps.
fn merge(a: &RgbaImage, b: &RgbaImage) -> RgbaImage {
    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    RgbaImage::from_fn(width, height, |x, y| {
        let pixel_a = sample_or_transparent(a, x, y);
        let pixel_b = sample_or_transparent(b, x, y);
        blend_over(pixel_a, pixel_b)
    })
}

fn sample_or_transparent(image: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
    if x < image.width() && y < image.height() {
        *image.get_pixel(x, y)
    } else {
        Rgba([0, 0, 0, 0])
    }
}

/// Source-over alpha blend of `src` onto `dst`
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = f64::from(src.0[3]) / 255.0;
    let dst_alpha = f64::from(dst.0[3]) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |index: usize| -> u8 {
        let src_channel = f64::from(src.0[index]);
        let dst_channel = f64::from(dst.0[index]);
        let blended =
            (src_channel * src_alpha + dst_channel * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        blended.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
